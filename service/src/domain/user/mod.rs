//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

pub use self::session::Session;

/// Back-office user.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Email`] of this [`User`], used as a login.
    pub email: Email,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`Phone`] of this [`User`].
    pub phone: Option<Phone>,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

impl User {
    /// Indicates whether this [`User`] is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// [`User`] which is not stored yet.
#[derive(Clone, Debug)]
pub struct New {
    /// [`Email`] of the new [`User`].
    pub email: Email,

    /// [`Name`] of the new [`User`].
    pub name: Name,

    /// [`PasswordHash`] of the new [`User`].
    pub password_hash: PasswordHash,

    /// [`Role`] of the new [`User`].
    pub role: Role,

    /// [`DateTime`] when the new [`User`] is created.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[serde(transparent)]
pub struct Id(i32);

define_text! {
    #[doc = "Name of a [`User`] or of an inquiring client."]
    Name(max = 200)
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() >= 8 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Salted password hash of a [`User`].
///
/// Stored as `sha256${salt}${hex digest}`.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Algorithm prefix of a [`PasswordHash`].
    const ALGORITHM: &'static str = "sha256";

    /// Creates a new [`PasswordHash`] from the given [`Password`] with a random
    /// salt.
    #[must_use]
    pub fn new(password: &Password) -> Self {
        // TODO: Switch to `argon2` once it's approved for the dependency tree.
        let salt = Uuid::new_v4().simple().to_string();
        Self::with_salt(password, &salt)
    }

    /// Creates a new [`PasswordHash`] from the given [`Password`] and `salt`.
    fn with_salt(password: &Password, salt: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(password.0.as_bytes())
            .finalize();
        Self(format!("{}${salt}${}", Self::ALGORITHM, hex::encode(digest)))
    }

    /// Verifies whether the given [`Password`] matches this [`PasswordHash`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        let mut parts = self.0.splitn(3, '$');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Self::ALGORITHM), Some(salt), Some(_)) => {
                Self::with_salt(password, salt) == *self
            }
            _ => false,
        }
    }
}

/// Email address of a [`User`] or of an inquiring client.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 255 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Phone number of a [`User`] or of an inquiring client.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: an optional leading
        /// `+` followed by digits, spaces, dashes and parentheses.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[\d\s()\-]{6,20}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

impl TryFrom<String> for Phone {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

define_kind! {
    #[doc = "Role of a [`User`]."]
    enum Role {
        #[doc = "Administrator with a back-office access."]
        Admin = "admin",

        #[doc = "Real-estate agent."]
        Agent = "agent",

        #[doc = "Client of the agency."]
        Client = "client",
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Password, PasswordHash, Phone};

    #[test]
    fn verifies_password_hash() {
        let password = Password::new("correct horse").unwrap();
        let hash = PasswordHash::new(&password);

        assert!(hash.to_string().starts_with("sha256$"));
        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("wrong horse").unwrap()));
    }

    #[test]
    fn salts_password_hash() {
        let password = Password::new("correct horse").unwrap();

        assert_ne!(PasswordHash::new(&password), PasswordHash::new(&password));
    }

    #[test]
    fn rejects_unknown_hash_format() {
        let password = Password::new("correct horse").unwrap();
        let hash = PasswordHash("$2b$12$abcdefghijklmnopqrstuv".into());

        assert!(!hash.verify(&password));
    }

    #[test]
    fn validates_contacts() {
        assert!(Email::new("ana@example.com").is_some());
        assert!(Email::new("ana.example.com").is_none());
        assert!(Email::new("").is_none());

        assert!(Phone::new("+54 11 4444-5555").is_some());
        assert!(Phone::new("(011) 4444 5555").is_some());
        assert!(Phone::new("call me").is_none());
        assert!(Phone::new("123").is_none());
    }
}
