//! End-to-end: compile a grid, then execute the rendered statement with its
//! bound parameters against a seeded in-memory database.

use exemplar::catalog::StaticCatalog;
use exemplar::row::{Row, SortDir};
use exemplar::sql::EmptyWhere;
use exemplar::{compile_grid, CompileOptions};
use rusqlite::Connection;

fn library_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory db");
    conn.execute_batch(
        "CREATE TABLE author (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         CREATE TABLE book (
             id INTEGER PRIMARY KEY,
             title TEXT NOT NULL,
             price INTEGER NOT NULL,
             author_id INTEGER NOT NULL REFERENCES author (id)
         );
         INSERT INTO author (id, name) VALUES (1, 'Austen'), (2, 'Orwell');
         INSERT INTO book (id, title, price, author_id) VALUES
             (1, 'Emma', 5, 1),
             (2, '1984', 15, 2),
             (3, 'Persuasion', 20, 1);",
    )
    .expect("seed schema");
    conn
}

fn library_catalog() -> StaticCatalog {
    StaticCatalog::sqlite().with_table("book").with_table("author")
}

fn run_pairs(conn: &Connection, sql: &str, params: &[String]) -> Vec<(String, String)> {
    let mut stmt = conn.prepare(sql).expect("prepare rendered sql");
    stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
        Ok((row.get(0)?, row.get(1)?))
    })
    .expect("bind params")
    .collect::<Result<_, _>>()
    .expect("fetch rows")
}

fn run_titles(conn: &Connection, sql: &str, params: &[String]) -> Vec<String> {
    let mut stmt = conn.prepare(sql).expect("prepare rendered sql");
    stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| row.get(0))
        .expect("bind params")
        .collect::<Result<_, _>>()
        .expect("fetch rows")
}

#[test]
fn test_join_plus_scalar_filter_returns_expected_rows() {
    let rows = vec![
        Row::new("Book", "title").with_show().with_sort(SortDir::Asc),
        Row::new("Author", "name").with_show(),
        Row::new("Book", "author").with_criteria("join", "Author.id"),
        Row::new("Book", "price").with_criteria("gt", "10"),
    ];

    let rendered = compile_grid(&rows, &library_catalog(), CompileOptions::default()).unwrap();
    let conn = library_db();
    let results = run_pairs(&conn, &rendered.sql, &rendered.params);
    assert_eq!(
        results,
        [
            ("1984".to_string(), "Orwell".to_string()),
            ("Persuasion".to_string(), "Austen".to_string()),
        ]
    );
}

#[test]
fn test_like_operator_binds_pattern_operand() {
    let rows = vec![
        Row::new("Book", "title").with_show(),
        Row::new("Book", "title").with_criteria("contains", "%ers%"),
    ];

    let rendered = compile_grid(&rows, &library_catalog(), CompileOptions::default()).unwrap();
    let conn = library_db();
    let titles = run_titles(&conn, &rendered.sql, &rendered.params);
    assert_eq!(titles, ["Persuasion"]);
}

#[test]
fn test_unfiltered_grid_executes_under_both_where_policies() {
    let rows = vec![Row::new("Book", "title").with_show().with_sort(SortDir::Asc)];

    let conn = library_db();
    for empty_where in [EmptyWhere::Omit, EmptyWhere::Tautology] {
        let options = CompileOptions::default().with_empty_where(empty_where);
        let rendered = compile_grid(&rows, &library_catalog(), options).unwrap();
        let titles = run_titles(&conn, &rendered.sql, &rendered.params);
        assert_eq!(titles, ["1984", "Emma", "Persuasion"]);
    }
}
