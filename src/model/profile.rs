use serde::{Deserialize, Serialize};

/// Gender as selected in the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
    Other,
}

impl Gender {
    /// The stored value (also what the form select submits)
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Unspecified => "",
            Gender::Male => "мужской",
            Gender::Female => "женский",
            Gender::Other => "другое",
        }
    }

    /// Parse a stored or typed value. Accepts the English names as well.
    pub fn parse(s: &str) -> Gender {
        match s.trim().to_lowercase().as_str() {
            "мужской" | "male" | "m" => Gender::Male,
            "женский" | "female" | "f" => Gender::Female,
            "другое" | "other" => Gender::Other,
            _ => Gender::Unspecified,
        }
    }

    /// Cycle through the select options in form order
    pub fn next(self) -> Gender {
        match self {
            Gender::Unspecified => Gender::Male,
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Other,
            Gender::Other => Gender::Unspecified,
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::parse(&s)
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        g.as_str().to_string()
    }
}

/// The persisted profile record. Keys are camelCase to stay compatible with
/// records written by the web cabinet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub birth_date: String,
    /// Only present after the first password change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "zero_percent")]
    pub completion_status: String,
}

fn zero_percent() -> String {
    "0%".to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            login: String::new(),
            email: String::new(),
            last_name: String::new(),
            first_name: String::new(),
            middle_name: String::new(),
            gender: Gender::Unspecified,
            phone: String::new(),
            city: String::new(),
            street: String::new(),
            house: String::new(),
            building: String::new(),
            birth_date: String::new(),
            password: None,
            completion_status: zero_percent(),
        }
    }
}

/// Fields editable through the profile form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Login,
    LastName,
    FirstName,
    MiddleName,
    Email,
    Phone,
    Gender,
    City,
    Street,
    House,
    Building,
    BirthDate,
}

impl ProfileField {
    pub const ALL: [ProfileField; 12] = [
        ProfileField::Login,
        ProfileField::LastName,
        ProfileField::FirstName,
        ProfileField::MiddleName,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Gender,
        ProfileField::City,
        ProfileField::Street,
        ProfileField::House,
        ProfileField::Building,
        ProfileField::BirthDate,
    ];

    /// Label shown next to the value
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Login => "Логин",
            ProfileField::LastName => "Фамилия",
            ProfileField::FirstName => "Имя",
            ProfileField::MiddleName => "Отчество",
            ProfileField::Email => "E-mail",
            ProfileField::Phone => "Телефон",
            ProfileField::Gender => "Пол",
            ProfileField::City => "Город",
            ProfileField::Street => "Улица",
            ProfileField::House => "Дом",
            ProfileField::Building => "Корпус",
            ProfileField::BirthDate => "Дата рождения",
        }
    }

    /// Key used on the command line and in stored records
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Login => "login",
            ProfileField::LastName => "lastName",
            ProfileField::FirstName => "firstName",
            ProfileField::MiddleName => "middleName",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Gender => "gender",
            ProfileField::City => "city",
            ProfileField::Street => "street",
            ProfileField::House => "house",
            ProfileField::Building => "building",
            ProfileField::BirthDate => "birthDate",
        }
    }

    /// Look up a field by its record key. Also accepts snake_case.
    pub fn from_key(key: &str) -> Option<ProfileField> {
        let normalized = key.replace(['_', '-'], "").to_lowercase();
        ProfileField::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase() == normalized)
    }
}

impl UserProfile {
    /// Current value of a field as display text (empty when unset)
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Login => &self.login,
            ProfileField::LastName => &self.last_name,
            ProfileField::FirstName => &self.first_name,
            ProfileField::MiddleName => &self.middle_name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Gender => self.gender.as_str(),
            ProfileField::City => &self.city,
            ProfileField::Street => &self.street,
            ProfileField::House => &self.house,
            ProfileField::Building => &self.building,
            ProfileField::BirthDate => &self.birth_date,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Login => self.login = value,
            ProfileField::LastName => self.last_name = value,
            ProfileField::FirstName => self.first_name = value,
            ProfileField::MiddleName => self.middle_name = value,
            ProfileField::Email => self.email = value,
            ProfileField::Phone => self.phone = value,
            ProfileField::Gender => self.gender = Gender::parse(&value),
            ProfileField::City => self.city = value,
            ProfileField::Street => self.street = value,
            ProfileField::House => self.house = value,
            ProfileField::Building => self.building = value,
            ProfileField::BirthDate => self.birth_date = value,
        }
    }

    /// Number of editable fields holding a value
    pub fn filled_fields(&self) -> usize {
        ProfileField::ALL
            .iter()
            .filter(|f| !self.get(**f).is_empty())
            .count()
    }

    /// Completion percentage over the editable fields, rounded half up
    pub fn completion_percent(&self) -> u32 {
        let total = ProfileField::ALL.len();
        let filled = self.filled_fields();
        ((filled * 100) as f64 / total as f64).round() as u32
    }

    /// Percentage string as stored in `completionStatus`
    pub fn compute_completion_status(&self) -> String {
        format!("{}%", self.completion_percent())
    }

    /// "Last First Middle", skipping empty parts
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_empty_with_zero_completion() {
        let p = UserProfile::default();
        assert_eq!(p.filled_fields(), 0);
        assert_eq!(p.completion_status, "0%");
        assert_eq!(p.compute_completion_status(), "0%");
    }

    #[test]
    fn one_of_twelve_fields_is_eight_percent() {
        let p = UserProfile {
            login: "ivanov".into(),
            ..Default::default()
        };
        assert_eq!(p.compute_completion_status(), "8%");
    }

    #[test]
    fn all_fields_is_one_hundred_percent() {
        let mut p = UserProfile::default();
        for f in ProfileField::ALL {
            p.set(f, "x".into());
        }
        p.set(ProfileField::Gender, "женский".into());
        assert_eq!(p.completion_percent(), 100);
    }

    #[test]
    fn completion_ignores_password_and_status() {
        let p = UserProfile {
            password: Some("secret".into()),
            completion_status: "100%".into(),
            ..Default::default()
        };
        assert_eq!(p.completion_percent(), 0);
    }

    #[test]
    fn completion_rounds_half_up() {
        // 6 of 12 = 50, 7 of 12 = 58.33
        let mut p = UserProfile::default();
        for f in &ProfileField::ALL[..7] {
            p.set(*f, "v".into());
        }
        p.set(ProfileField::Gender, "".into());
        assert_eq!(p.filled_fields(), 6);
        assert_eq!(p.completion_percent(), 50);
        p.city = "Москва".into();
        assert_eq!(p.completion_percent(), 58);
    }

    #[test]
    fn completion_is_bounded() {
        let mut p = UserProfile::default();
        for (i, f) in ProfileField::ALL.iter().enumerate() {
            p.set(*f, if *f == ProfileField::Gender { "другое".into() } else { "v".into() });
            let pct = p.completion_percent();
            assert!(pct <= 100);
            assert_eq!(pct, (((i + 1) * 100) as f64 / 12.0).round() as u32);
        }
    }

    #[test]
    fn gender_round_trips_through_stored_value() {
        for g in [Gender::Unspecified, Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(Gender::parse(g.as_str()), g);
        }
        assert_eq!(Gender::parse("Male"), Gender::Male);
        assert_eq!(Gender::parse("nonsense"), Gender::Unspecified);
    }

    #[test]
    fn deserializes_web_cabinet_record() {
        let json = r#"{
            "login": "ivanov",
            "email": "ivan@example.com",
            "lastName": "Иванов",
            "firstName": "Иван",
            "middleName": "",
            "gender": "мужской",
            "phone": "",
            "city": "",
            "street": "",
            "house": "",
            "building": "",
            "birthDate": "1990-01-01",
            "completionStatus": "42%"
        }"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.last_name, "Иванов");
        assert_eq!(p.gender, Gender::Male);
        assert_eq!(p.password, None);
        assert_eq!(p.completion_status, "42%");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let p: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(p, UserProfile::default());
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_password() {
        let p = UserProfile::default();
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("lastName").is_some());
        assert!(v.get("birthDate").is_some());
        assert!(v.get("password").is_none());
        assert_eq!(v["completionStatus"], "0%");
    }

    #[test]
    fn field_lookup_by_key() {
        assert_eq!(ProfileField::from_key("lastName"), Some(ProfileField::LastName));
        assert_eq!(ProfileField::from_key("last_name"), Some(ProfileField::LastName));
        assert_eq!(ProfileField::from_key("birth-date"), Some(ProfileField::BirthDate));
        assert_eq!(ProfileField::from_key("password"), None);
    }

    #[test]
    fn full_name_skips_empty_parts() {
        let p = UserProfile {
            last_name: "Иванов".into(),
            first_name: "Иван".into(),
            ..Default::default()
        };
        assert_eq!(p.full_name(), "Иванов Иван");
    }
}
