//! Test fixtures - reusable mapping content and class descriptors.

use docproxy::{ClassDescriptor, ClassKind, DeclaredField, DeclaredType};
use serde_json::json;

/// Two documents, one mapped superclass and one embedded value
pub const BLOG_MAPPING: &str = r#"
[[class]]
name = "app::Person"
kind = "mapped_superclass"
identifier = ["id"]
fields = ["email"]

[[class.declared]]
name = "email"
visibility = "private"

[[class]]
name = "app::User"
parent = "app::Person"
source_file = "src/user.rs"
fields = ["name"]

[[class.declared]]
name = "id"
visibility = "private"

[[class.declared]]
name = "name"
visibility = "private"

[[class]]
name = "app::Post"
identifier = ["id"]
fields = ["title"]
associations = ["author"]

[[class]]
name = "app::Address"
kind = "embedded"
fields = ["street"]
"#;

/// `User { id, name }` with private state and one unmapped field
pub fn user_class() -> ClassDescriptor {
    ClassDescriptor::builder("app::User")
        .identifier("id")
        .field("name")
        .declare(DeclaredField::private("id"))
        .declare(DeclaredField::private("name"))
        .declare(DeclaredField::private("visits").with_default(json!(0)))
        .build()
}

/// `Admin` extends `User`; both declare a private `email`, only the
/// ancestor's is mapped
pub fn admin_class() -> ClassDescriptor {
    ClassDescriptor::builder("app::Admin")
        .identifier("id")
        .field("level")
        .field("email")
        .declare(DeclaredField::public("level"))
        .declare(DeclaredField::private("notes").with_default(json!("")))
        .ancestor(DeclaredType::new(
            "app::User",
            vec![
                DeclaredField::private("id"),
                DeclaredField::private("email"),
                DeclaredField::protected("audit").with_default(json!([])),
            ],
        ))
        .build()
}

pub fn mapped_superclass() -> ClassDescriptor {
    ClassDescriptor::builder("app::Base")
        .kind(ClassKind::MappedSuperclass)
        .build()
}

pub fn embedded_class() -> ClassDescriptor {
    ClassDescriptor::builder("app::Address")
        .kind(ClassKind::Embedded)
        .field("street")
        .build()
}

pub fn abstract_class() -> ClassDescriptor {
    ClassDescriptor::builder("app::Animal")
        .identifier("id")
        .abstract_type(true)
        .build()
}
