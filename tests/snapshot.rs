use cinescrape::{
    CastMember, CsvSnapshot, DetailFields, MovieRecord, SnapshotError, SnapshotStore, Stub,
};
use tempfile::tempdir;

fn enriched_record() -> MovieRecord {
    let stub = Stub {
        index: 1,
        rating: 83,
        title: "The Matrix".to_string(),
        year: 1999,
        link: "https://movies.test/m/the_matrix".to_string(),
    };
    let details = DetailFields {
        genre: Some("sci-fi,adventure".to_string()),
        description: Some("A hacker learns the truth, with \"quotes\", commas,\nand newlines.".to_string()),
        poster_img: Some("https://img.test/poster.jpg".to_string()),
        cover_img: Some("https://img.test/cover.jpg".to_string()),
        release_date: Some("Mar 31, 1999".to_string()),
        tomato_score: Some(83),
        tomato_reviews: Some(413),
        audience_score: Some(85),
        audience_ratings: Some(33_014_106),
        cast_crew: Some(vec![
            CastMember {
                name: "Keanu Reeves".to_string(),
                role: Some("Neo".to_string()),
                img: Some("https://img.test/reeves.jpg".to_string()),
            },
            CastMember {
                name: "Lana Wachowski".to_string(),
                role: None,
                img: None,
            },
        ]),
    };
    MovieRecord::assemble(stub, details)
}

fn bare_record() -> MovieRecord {
    let stub = Stub {
        index: 2,
        rating: 90,
        title: "Untitled".to_string(),
        year: 2001,
        link: "https://movies.test/m/untitled".to_string(),
    };
    MovieRecord::assemble(stub, DetailFields::default())
}

#[test]
fn round_trip_reproduces_records() {
    let dir = tempdir().unwrap();
    let store = CsvSnapshot::new(dir.path().join("movies.csv"));

    let mut empty_cast = bare_record();
    empty_cast.index = 3;
    empty_cast.cast_crew = Some(vec![]);

    let records = vec![enriched_record(), bare_record(), empty_cast];
    store.write(&records).unwrap();

    let decoded = store.read().unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn numeric_fields_come_back_as_numbers() {
    let dir = tempdir().unwrap();
    let store = CsvSnapshot::new(dir.path().join("movies.csv"));
    store.write(&[enriched_record()]).unwrap();

    let decoded = store.read().unwrap();
    assert_eq!(decoded[0].index, 1);
    assert_eq!(decoded[0].rating, 83);
    assert_eq!(decoded[0].year, 1999);
    assert_eq!(decoded[0].tomato_reviews, Some(413));
    assert_eq!(decoded[0].audience_ratings, Some(33_014_106));
}

#[test]
fn cast_crew_keeps_names_roles_and_images_in_order() {
    let dir = tempdir().unwrap();
    let store = CsvSnapshot::new(dir.path().join("movies.csv"));
    store.write(&[enriched_record()]).unwrap();

    let cast = store.read().unwrap()[0].cast_crew.clone().unwrap();
    assert_eq!(cast.len(), 2);
    assert_eq!(cast[0].name, "Keanu Reeves");
    assert_eq!(cast[0].role.as_deref(), Some("Neo"));
    assert_eq!(cast[1].name, "Lana Wachowski");
    assert_eq!(cast[1].role, None);
    assert_eq!(cast[1].img, None);
}

#[test]
fn missing_file_reads_as_not_found() {
    let dir = tempdir().unwrap();
    let store = CsvSnapshot::new(dir.path().join("nope.csv"));
    assert!(matches!(store.read(), Err(SnapshotError::NotFound(_))));
}

#[test]
fn write_creates_missing_parent_dirs() {
    let dir = tempdir().unwrap();
    let store = CsvSnapshot::new(dir.path().join("nested/export/movies.csv"));
    store.write(&[bare_record()]).unwrap();
    assert_eq!(store.read().unwrap().len(), 1);
}

#[test]
fn snapshot_schema_is_the_record_field_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    let store = CsvSnapshot::new(path.clone());
    store.write(&[bare_record()]).unwrap();

    let contents = fs_err::read_to_string(path).unwrap();
    let header = contents.lines().next().unwrap();
    assert_eq!(
        header,
        "index,rating,title,genre,year,description,link,poster_img,\
         cover_img,release_date,tomato_score,tomato_reviews,audience_score,\
         audience_ratings,cast_crew"
    );
}
