use crate::cli::commands::{ConfigAction, ConfigCmd, ConfigSetArgs};
use crate::io::config_io;

use super::Context;

pub fn cmd_config(ctx: &Context, args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => show(ctx, json),
        ConfigAction::Set(args) => set(ctx, args),
        ConfigAction::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let value = serde_json::json!({
            "config_file": ctx.config_path,
            "data_dir": ctx.paths.data_dir,
            "remote_dir": ctx.paths.remote_dir,
            "seed_starter": ctx.config.projects.seed_starter,
            "colors": ctx.config.ui.colors,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("# {}", ctx.config_path.display());
    println!("# data_dir   = {}", ctx.paths.data_dir.display());
    println!("# remote_dir = {}", ctx.paths.remote_dir.display());
    let text = toml::to_string_pretty(&ctx.config)?;
    print!("{}", text);
    Ok(())
}

fn set(ctx: &Context, args: ConfigSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut doc) = config_io::read_config(&ctx.config_path)?;
    config_io::set_value(&mut doc, &args.key, &args.value)?;
    config_io::write_config(&ctx.config_path, &doc)?;
    println!("{} = {}", args.key, args.value);
    Ok(())
}
