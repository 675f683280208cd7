// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use sqlshape::{Entity, Value};

#[derive(Entity)]
pub struct Person {
    #[id]
    #[identity]
    pub id: i64,

    pub name: String,

    pub age: Option<i32>
}

fn main() {
    let shape = Person::describe();
    assert_eq!(shape.table(), "Person");
    assert!(shape.schema_name().is_none());
    assert!(!Person::GENERIC);

    let columns: Vec<_> = shape.fields().iter().map(|f| f.column).collect();
    assert_eq!(columns, ["id", "name", "age"]);
    assert_eq!(shape.identity().map(|f| f.property), Some("id"));
    assert!(shape.fields()[2].nullable);

    let person = Person {
        id:   7,
        name: "Bob".to_string(),
        age:  None
    };
    assert_eq!(person.property("id"), Some(Value::I64(7)));
    assert_eq!(person.property("name"), Some(Value::Text("Bob".into())));
    assert_eq!(person.property("age"), Some(Value::Null));
    assert_eq!(person.property("nickname"), None);
}
