// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end translation tests over every built-in dialect.

use sqlshape::{
    Comparison, ConditionNode, Engine, Entity, Error, Operator, OrderField, Pagination,
    QueryOptions, Value, Where
};

#[derive(Entity)]
#[entity(table = "Person", rename_all = "PascalCase")]
pub struct Person {
    #[id]
    #[identity]
    pub id: i64,

    pub name: String,

    pub age: Option<i32>
}

#[derive(Entity)]
#[entity(table = "Letters", rename_all = "UPPERCASE")]
pub struct Letters {
    #[id]
    pub a: i32,

    pub b: i32,

    pub c: i32
}

/// (dialect, opening quote, closing quote, parameter prefix)
const DIALECTS: &[(&str, &str, &str, &str)] = &[
    ("sqlserver", "[", "]", "@"),
    ("postgres", "\"", "\"", "@"),
    ("mysql", "`", "`", "@"),
    ("sqlite", "[", "]", "@")
];

fn bob() -> Person {
    Person {
        id:   1,
        name: "Bob".to_string(),
        age:  Some(42)
    }
}

#[test]
fn equality_renders_one_named_parameter_in_every_dialect() {
    let engine = Engine::new();
    for (dialect, open, close, prefix) in DIALECTS {
        let command = engine
            .query::<Person>(dialect, Person::COLUMNS.name.eq("Bob"), &QueryOptions::new())
            .unwrap();

        let expected = format!("{open}Name{close} = {prefix}Name");
        assert!(command.text.contains(&expected), "{dialect}: {}", command.text);
        assert_eq!(command.parameters.len(), 1, "{dialect}");
        assert_eq!(command.parameters[0].name, "Name");
        assert_eq!(command.parameters[0].value, Value::Text("Bob".into()));
    }
}

#[test]
fn null_comparisons_bind_nothing() {
    let engine = Engine::new();
    for (dialect, ..) in DIALECTS {
        let command = engine
            .query::<Person>(dialect, Person::COLUMNS.age.eq(None::<i32>), &QueryOptions::new())
            .unwrap();
        assert!(command.text.contains("IS NULL"), "{dialect}");
        assert!(command.parameters.is_empty());

        let command = engine
            .query::<Person>(dialect, Person::COLUMNS.age.ne(None::<i32>), &QueryOptions::new())
            .unwrap();
        assert!(command.text.contains("IS NOT NULL"), "{dialect}");
        assert!(command.parameters.is_empty());
    }
}

#[test]
fn empty_in_matches_nothing() {
    let engine = Engine::new();
    for (dialect, ..) in DIALECTS {
        let ids: Vec<i64> = Vec::new();
        let command = engine
            .query::<Person>(dialect, Person::COLUMNS.id.in_(ids), &QueryOptions::new())
            .unwrap();
        assert!(command.text.contains("1 = 0"), "{dialect}: {}", command.text);
        assert!(!command.text.contains("IN ()"));
        assert!(command.parameters.is_empty());
    }
}

#[test]
fn non_empty_in_binds_every_item() {
    let engine = Engine::new();
    let command = engine
        .query::<Person>("postgres", Person::COLUMNS.id.in_([3, 5]), &QueryOptions::new())
        .unwrap();
    assert!(command.text.contains("\"Id\" IN (@Id_In_0, @Id_In_1)"));
    assert_eq!(command.value("Id_In_1"), Some(&Value::I64(5)));
}

#[test]
fn between_binds_two_parameters() {
    let engine = Engine::new();
    for (dialect, ..) in DIALECTS {
        let command = engine
            .query::<Person>(dialect, Person::COLUMNS.age.between(Some(18_i32), Some(65_i32)), &QueryOptions::new())
            .unwrap();
        assert!(command.text.contains("BETWEEN @Age_Left AND @Age_Right"), "{dialect}");
        assert_eq!(command.parameters.len(), 2);
    }
}

#[test]
fn between_with_three_bounds_is_rejected() {
    let engine = Engine::new();
    let tree = Comparison::new("age", Operator::Between, Value::list([1, 2, 3]));
    let err = engine
        .query::<Person>("sqlserver", tree, &QueryOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConditionShape { .. }));
}

#[test]
fn repeated_translation_is_stable() {
    let engine = Engine::new();
    let first = engine
        .query::<Person>("mysql", Person::COLUMNS.name.eq("Bob"), &QueryOptions::new())
        .unwrap();
    let second = engine
        .query::<Person>("mysql", Person::COLUMNS.name.eq("Alice"), &QueryOptions::new())
        .unwrap();

    assert_eq!(first.text, second.text);
    let names = |c: &sqlshape::Command| c.parameters.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&first), names(&second));
    assert_eq!(second.value("Name"), Some(&Value::Text("Alice".into())));
    assert_eq!(engine.statements().len(), 1);
}

#[test]
fn explicit_tree_keeps_nesting() {
    let engine = Engine::new();
    let tree = ConditionNode::and(vec![
        ConditionNode::or(vec![
            Comparison::new("a", Operator::Equal, 1).into(),
            Comparison::new("b", Operator::Equal, 2).into(),
        ]),
        Comparison::new("c", Operator::Equal, 3).into(),
    ]);
    let command = engine
        .query::<Letters>("sqlserver", tree, &QueryOptions::new())
        .unwrap();
    assert_eq!(
        command.text,
        "SELECT [A], [B], [C] FROM [dbo].[Letters] WHERE (([A] = @A) OR ([B] = @B)) AND ([C] = @C);"
    );
    assert_eq!(command.parameters.len(), 3);
}

#[test]
fn example_scenario() {
    let engine = Engine::new();
    let filter = Person::COLUMNS.age.is_null() | Person::COLUMNS.name.eq("Bob");
    let command = engine
        .query::<Person>("sqlserver", filter, &QueryOptions::new())
        .unwrap();
    assert_eq!(
        command.text,
        "SELECT [Id], [Name], [Age] FROM [dbo].[Person] WHERE ([Age] IS NULL) OR ([Name] = @Name);"
    );
    assert_eq!(command.parameters.len(), 1);
    assert_eq!(command.value("Name"), Some(&Value::Text("Bob".into())));
}

#[test]
fn captured_values_are_read_at_translation() {
    let engine = Engine::new();
    let wanted = String::from("Carol");
    let filter = Person::COLUMNS.name.eq_with(move || wanted.clone());
    let command = engine
        .query::<Person>("sqlite", filter, &QueryOptions::new())
        .unwrap();
    assert_eq!(command.value("Name"), Some(&Value::Text("Carol".into())));
}

#[test]
fn paging_per_dialect() {
    let engine = Engine::new();
    let options = QueryOptions::new()
        .order_by(OrderField::desc("age"))
        .page(Pagination::page(2, 10));

    let command = engine.query::<Person>("sqlserver", Where::All, &options).unwrap();
    assert!(command.text.ends_with("ORDER BY [Age] DESC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY;"));

    let command = engine.query::<Person>("postgres", Where::All, &options).unwrap();
    assert!(command.text.ends_with("ORDER BY \"Age\" DESC LIMIT 10 OFFSET 20;"));
}

#[test]
fn insert_retrieves_identity_per_dialect() {
    let engine = Engine::new();
    let person = bob();

    let command = engine.insert("sqlserver", &person).unwrap();
    assert_eq!(
        command.text,
        "INSERT INTO [dbo].[Person] ([Name], [Age]) VALUES (@Name, @Age); SELECT CONVERT(BIGINT, SCOPE_IDENTITY()) AS [Result];"
    );
    assert!(command.value("Id").is_none());
    assert_eq!(command.value("Age"), Some(&Value::I32(42)));

    let command = engine.insert("postgres", &person).unwrap();
    assert!(command.text.contains("RETURNING \"Id\""));

    let command = engine.insert("mysql", &person).unwrap();
    assert!(command.text.contains("LAST_INSERT_ID()"));

    let command = engine.insert("sqlite", &person).unwrap();
    assert!(command.text.contains("last_insert_rowid()"));
}

#[test]
fn insert_all_splits_into_batches() {
    let engine = Engine::new();
    let people: Vec<Person> = (0..5)
        .map(|i| Person {
            id:   i,
            name: format!("p{i}"),
            age:  None
        })
        .collect();

    let commands = engine.insert_all("sqlserver", &people, Some(2)).unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0].parameters.len(), 4);
    assert_eq!(commands[2].parameters.len(), 2);
    assert_eq!(commands[1].value("Name_1"), Some(&Value::Text("p3".into())));

    let err = engine.insert_all("sqlserver", &people, Some(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidBatchSize { size: 0, .. }));
}

#[test]
fn update_and_delete() {
    let engine = Engine::new();
    let command = engine.update("sqlserver", &bob()).unwrap();
    assert_eq!(
        command.text,
        "UPDATE [dbo].[Person] SET [Name] = @Name, [Age] = @Age WHERE ([Id] = @Id);"
    );

    let command = engine
        .delete::<Person>("mysql", Person::COLUMNS.age.lt(Some(18_i32)))
        .unwrap();
    assert_eq!(command.text, "DELETE FROM `Person` WHERE (`Age` < @Age);");

    let command = engine.delete_all("sqlserver", &[bob()]).unwrap();
    assert!(command.text.contains("[Id] IN (@Id_In_0)"));
}

#[test]
fn merge_per_dialect() {
    let engine = Engine::new();
    let person = bob();

    let command = engine.merge("sqlserver", &person, &[]).unwrap();
    assert!(command.text.starts_with("MERGE [dbo].[Person] AS T"));

    let command = engine.merge("postgres", &person, &["name"]).unwrap();
    assert!(command.text.contains("ON CONFLICT (\"Name\")"));

    let command = engine.merge("mysql", &person, &[]).unwrap();
    assert!(command.text.contains("ON DUPLICATE KEY UPDATE"));

    let command = engine.merge("sqlite", &person, &[]).unwrap();
    assert!(command.text.starts_with("INSERT OR REPLACE INTO [Person]"));
}

#[test]
fn unknown_field_and_dialect() {
    let engine = Engine::new();
    let err = engine
        .count::<Person>("oracle", Where::All, None)
        .unwrap_err();
    assert_eq!(err, Error::UnsupportedDialect("oracle".into()));

    let tree = Comparison::new("nickname", Operator::Equal, "x");
    let err = engine
        .query::<Person>("sqlserver", tree, &QueryOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field, .. } if field == "nickname"));
}

#[test]
fn hints_are_rejected_where_unsupported() {
    let engine = Engine::new();
    let command = engine
        .count::<Person>("sqlserver", Where::All, Some("WITH (NOLOCK)"))
        .unwrap();
    assert!(command.text.contains("[Person] WITH (NOLOCK)"));

    let err = engine
        .count::<Person>("postgres", Where::All, Some("WITH (NOLOCK)"))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedDialectFeature { .. }));
}
