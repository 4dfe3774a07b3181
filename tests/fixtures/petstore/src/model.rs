use bson::oid::ObjectId;
use std::collections::HashMap;

/// A pet in the store.
/// @def Pets
#[allow(non_snake_case)]
pub struct Pet {
    pub id: bson::oid::ObjectId,
    #[swag = "Tag"]
    pub tag: Vec<Tag>,
    pub nickName: String,
    pub age: u8,
    pub vaccinated: bool,
    pub attributes: HashMap<String, String>,
}

/// @def Tag
pub struct Tag {
    pub id: ObjectId,
    pub name: String,
}

/// @def Error
pub struct Error {
    pub code: i32,
    pub message: String,
}

/// Internal bookkeeping, never exported.
pub struct Audit {
    pub entry: Option<String>,
}
