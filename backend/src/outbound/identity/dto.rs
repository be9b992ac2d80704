//! DTOs for decoding identity service responses.
//!
//! The service names display fields in Turkish (`isim`, `soyisim`, `resim`)
//! and also returns the stored password hash, which is never decoded.

use serde::Deserialize;

use crate::domain::{User, UserId};

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: i32,
    pub(super) email: String,
    #[serde(rename = "isim", default)]
    pub(super) first_name: String,
    #[serde(rename = "soyisim", default)]
    pub(super) last_name: String,
    #[serde(rename = "resim", default)]
    pub(super) avatar_url: Option<String>,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(self.id).map_err(|err| err.to_string())?;
        Ok(User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            avatar_url: self.avatar_url.filter(|url| !url.trim().is_empty()),
        })
    }
}
