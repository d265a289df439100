use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::user::{Role, User};

fn test_user() -> User {
    User {
        id: Uuid::new_v4(),
        username: "wren".to_string(),
        first_name: "Wren".to_string(),
        last_name: "Park".to_string(),
        email: "wren@example.com".to_string(),
        password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
        is_active: true,
        role: Role {
            name: "user".to_string(),
            level: 1,
        },
        created_at: Utc::now(),
    }
}

#[test]
fn test_display_name() {
    let user = test_user();
    assert_eq!(user.display_name(), "Wren Park");
}

#[test]
fn test_role_precedence() {
    let admin = Role {
        name: "admin".to_string(),
        level: 10,
    };
    let user = Role {
        name: "user".to_string(),
        level: 1,
    };

    assert!(admin.outranks(&user));
    assert!(admin.outranks(&admin));
    assert!(!user.outranks(&admin));
}

#[test]
fn test_password_hash_never_serialized() {
    let user = test_user();
    let json = serde_json::to_string(&user).unwrap();

    assert!(!json.contains("password_hash"));
    assert!(!json.contains("$2b$"));
}

#[test]
fn test_deserializes_without_password_hash() {
    // A cached user comes back without its hash
    let user = test_user();
    let json = serde_json::to_string(&user).unwrap();
    let decoded: User = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.id, user.id);
    assert_eq!(decoded.email, user.email);
    assert!(decoded.password_hash.is_empty());
}
