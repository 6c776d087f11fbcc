use book_catalog::db::{
    count_books, create_book, delete_book, fetch_books, open_catalog, search_books, update_book,
};
use book_catalog::{Book, BookFields};
use tempfile::TempDir;

fn fields(title: &str, author: &str, year: &str, category: &str) -> BookFields {
    BookFields::new(title, author, year, category)
}

fn open_temp() -> (TempDir, rusqlite::Connection) {
    let dir = TempDir::new().unwrap();
    let conn = open_catalog(&dir.path().join("nested").join("catalog.sqlite")).unwrap();
    (dir, conn)
}

#[test]
fn dune_lifecycle() {
    let (_dir, conn) = open_temp();

    let dune = create_book(&conn, &fields("Dune", "Herbert", "1965", "SciFi")).unwrap();
    assert_eq!(dune.id, 1);
    assert_eq!(
        fetch_books(&conn).unwrap(),
        vec![Book::from_fields(1, fields("Dune", "Herbert", "1965", "SciFi"))]
    );

    update_book(&conn, 1, &fields("Dune", "F. Herbert", "1965", "SciFi")).unwrap();
    assert_eq!(
        fetch_books(&conn).unwrap(),
        vec![Book::from_fields(1, fields("Dune", "F. Herbert", "1965", "SciFi"))]
    );

    assert_eq!(search_books(&conn, "herb").unwrap().len(), 1);
    assert!(search_books(&conn, "xyz").unwrap().is_empty());

    delete_book(&conn, 1).unwrap();
    assert!(fetch_books(&conn).unwrap().is_empty());
}

#[test]
fn create_adds_exactly_one_matching_record() {
    let (_dir, conn) = open_temp();
    create_book(&conn, &fields("Emma", "Austen", "1815", "Novel")).unwrap();

    let new = fields("Ulysses", "Joyce", "1922", "Modernist");
    let created = create_book(&conn, &new).unwrap();
    let books = fetch_books(&conn).unwrap();

    let matching: Vec<&Book> = books.iter().filter(|book| book.fields() == new).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
    assert_eq!(books.iter().filter(|book| book.id == created.id).count(), 1);
}

#[test]
fn update_keeps_count_and_delete_removes_one() {
    let (_dir, conn) = open_temp();
    let ids: Vec<i64> = ["A", "B", "C"]
        .into_iter()
        .map(|title| create_book(&conn, &fields(title, "x", "2000", "y")).unwrap().id)
        .collect();

    update_book(&conn, ids[1], &fields("B2", "x2", "2001", "y2")).unwrap();
    let books = fetch_books(&conn).unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[1], Book::from_fields(ids[1], fields("B2", "x2", "2001", "y2")));

    delete_book(&conn, ids[0]).unwrap();
    let books = fetch_books(&conn).unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|book| book.id != ids[0]));
}

#[test]
fn empty_search_matches_list_and_results_contain_query() {
    let (_dir, conn) = open_temp();
    create_book(&conn, &fields("Dune", "Herbert", "1965", "SciFi")).unwrap();
    create_book(&conn, &fields("Emma", "Austen", "1815", "Novel")).unwrap();
    create_book(&conn, &fields("Neuromancer", "Gibson", "1984", "SciFi")).unwrap();

    assert_eq!(search_books(&conn, "").unwrap(), fetch_books(&conn).unwrap());

    for query in ["sci", "en", "Gib", "zzz"] {
        let needle = query.to_lowercase();
        for book in search_books(&conn, query).unwrap() {
            assert!(
                [&book.title, &book.author, &book.category]
                    .iter()
                    .any(|value| value.to_lowercase().contains(&needle)),
                "{book:?} does not contain {query:?}"
            );
        }
    }
    assert_eq!(search_books(&conn, "sci").unwrap().len(), 2);
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.sqlite");
    {
        let conn = open_catalog(&path).unwrap();
        create_book(&conn, &fields("Dune", "Herbert", "1965", "SciFi")).unwrap();
    }

    let conn = open_catalog(&path).unwrap();
    assert_eq!(count_books(&conn).unwrap(), 1);
    let next = create_book(&conn, &fields("Emma", "Austen", "1815", "Novel")).unwrap();
    assert_eq!(next.id, 2);
}
