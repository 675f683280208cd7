// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use sqlshape::{Engine, Entity};

#[derive(Entity)]
#[entity(table = "OrderLines", rename_all = "snake_case")]
pub struct OrderLine {
    #[id]
    pub order_id: i64,

    #[id]
    pub line_no: i32,

    pub quantity: i32
}

fn main() {
    assert_eq!(OrderLine::describe().primary_keys().count(), 2);

    let engine = Engine::new();
    let line = OrderLine {
        order_id: 1,
        line_no:  2,
        quantity: 5
    };
    let command = engine.update("postgres", &line).unwrap();
    assert_eq!(
        command.text,
        "UPDATE \"public\".\"OrderLines\" SET \"quantity\" = @quantity WHERE (\"order_id\" = @order_id) AND (\"line_no\" = @line_no);"
    );
}
