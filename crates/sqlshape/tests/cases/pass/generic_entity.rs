// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use sqlshape::{Engine, Entity, QueryOptions, Value};

#[derive(Entity)]
#[entity(table = "Tags")]
pub struct Tagged<T> {
    #[id]
    pub id: i64,

    pub tag: T
}

fn main() {
    assert!(Tagged::<String>::GENERIC);

    let item = Tagged {
        id:  1,
        tag: "red".to_string()
    };
    assert_eq!(item.property("tag"), Some(Value::Text("red".into())));

    let engine = Engine::new();
    let filter = Tagged::<String>::COLUMNS.tag.eq("red");
    let command = engine
        .query::<Tagged<String>>("sqlite", filter, &QueryOptions::new())
        .unwrap();
    assert_eq!(command.text, "SELECT [id], [tag] FROM [Tags] WHERE ([tag] = @tag);");
    assert!(engine.metadata().is_empty());
}
