// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use sqlshape::{Column, Entity, Expr};

#[derive(Entity)]
pub struct Task {
    #[id]
    pub id: i32,

    pub title: String,

    pub done: bool,

    pub due: Option<chrono::NaiveDate>
}

fn main() {
    let columns = Task::COLUMNS;
    let _: Column<Task, i32> = columns.id;
    let _: Column<Task, Option<chrono::NaiveDate>> = columns.due;

    let expr: Expr = columns.done.is_false()
        & columns.title.starts_with("fix")
        & columns.id.in_([1, 2, 3])
        & columns.due.is_not_null();
    assert!(expr.to_string().contains("title"));

    assert_eq!(Task::COLUMNS.title.name(), "title");
}
