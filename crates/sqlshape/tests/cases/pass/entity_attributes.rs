// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use sqlshape::{DbType, Entity};

#[derive(Entity)]
#[entity(table = "Visits", schema = "web", rename_all = "PascalCase")]
pub struct Visit {
    #[id]
    pub visit_id: uuid::Uuid,

    #[column(name = "Url")]
    pub page_url: String,

    #[column(db_type = "SmallDateTime")]
    pub seen_at: chrono::NaiveDateTime,

    #[column(skip)]
    pub scratch: Vec<u8>
}

fn main() {
    let shape = Visit::describe();
    assert_eq!(shape.table(), "Visits");
    assert_eq!(shape.schema_name(), Some("web"));

    let columns: Vec<_> = shape.fields().iter().map(|f| f.column).collect();
    assert_eq!(columns, ["VisitId", "Url", "SeenAt"]);
    assert_eq!(shape.fields()[2].db_type, Some(DbType::SmallDateTime));
    assert_eq!(shape.primary_keys().count(), 1);
    assert!(shape.identity().is_none());
    assert!(shape.find("scratch").is_none());
}
