//! Parser for the comma-separated ratings and movies tables.
//!
//! - ratings.csv: userId,movieId,rating[,timestamp]
//! - movies.csv: movieId,title,genres
//!
//! The first row of each file is a header and is discarded. Quoted fields
//! are honored, so titles such as `"American President, The (1995)"` parse
//! as a single column. Any malformed row fails the whole load.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const RATING_COLUMNS: usize = 3;
const MOVIE_COLUMNS: usize = 3;

/// Parse the ratings table from a file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = open(path)?;
    read_ratings(file, &display_name(path))
}

/// Parse the movies table from a file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = open(path)?;
    read_movies(file, &display_name(path))
}

/// Parse ratings from any reader. `file` is only used in error messages.
pub fn read_ratings<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut reader = csv_reader(reader);
    check_header(&mut reader, file, RATING_COLUMNS, false)?;

    let mut ratings = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| map_csv_error(file, e))?;
        let line = line_of(&record);

        ratings.push(Rating {
            user_id: parse_field(&record, 0, "userId", file, line)?,
            movie_id: parse_field(&record, 1, "movieId", file, line)?,
            score: parse_field(&record, 2, "rating", file, line)?,
        });
    }
    Ok(ratings)
}

/// Parse movies from any reader. `file` is only used in error messages.
pub fn read_movies<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut reader = csv_reader(reader);
    check_header(&mut reader, file, MOVIE_COLUMNS, true)?;

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| map_csv_error(file, e))?;
        let line = line_of(&record);

        movies.push(Movie {
            id: parse_field(&record, 0, "movieId", file, line)?,
            title: record[1].to_string(),
            genres: record[2].to_string(),
        });
    }
    Ok(movies)
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(File::open(path)?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// The header fixes the column count for every following row (the csv
/// reader enforces equal lengths). Here we only check it is wide enough,
/// or exactly `columns` wide when `exact` is set.
fn check_header<R: Read>(
    reader: &mut csv::Reader<R>,
    file: &str,
    columns: usize,
    exact: bool,
) -> Result<()> {
    let found = reader.headers().map_err(|e| map_csv_error(file, e))?.len();
    if found < columns || (exact && found != columns) {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            expected: columns,
            found,
            line: 1,
        });
    }
    Ok(())
}

fn line_of(record: &csv::StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn parse_field<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    file: &str,
    line: usize,
) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })?;

    raw.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {} {:?}: {}", name, raw, e),
    })
}

fn map_csv_error(file: &str, err: csv::Error) -> DataLoadError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            expected: *expected_len as usize,
            found: *len as usize,
            line: pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
        };
    }
    DataLoadError::CsvError {
        file: file.to_string(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ratings_discards_header() {
        let input = "userId,movieId,rating,timestamp\n1,31,2.5,1260759144\n1,1029,3.0,1260759179\n";
        let ratings = read_ratings(input.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], Rating::new(1, 31, 2.5));
        assert_eq!(ratings[1], Rating::new(1, 1029, 3.0));
    }

    #[test]
    fn test_read_ratings_without_timestamp() {
        let input = "userId,movieId,rating\n7,10,4.0\n";
        let ratings = read_ratings(input.as_bytes(), "ratings.csv").unwrap();
        assert_eq!(ratings, vec![Rating::new(7, 10, 4.0)]);
    }

    #[test]
    fn test_read_ratings_rejects_non_numeric_score() {
        let input = "userId,movieId,rating\n1,10,great\n";
        let err = read_ratings(input.as_bytes(), "ratings.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("rating"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_ratings_rejects_short_row() {
        let input = "userId,movieId,rating\n1,10,4.0\n2,20\n";
        let err = read_ratings(input.as_bytes(), "ratings.csv").unwrap_err();

        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch {
                expected: 3,
                found: 2,
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_read_ratings_rejects_narrow_header() {
        let input = "userId,movieId\n1,10\n";
        let err = read_ratings(input.as_bytes(), "ratings.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::FieldCountMismatch { line: 1, .. }));
    }

    #[test]
    fn test_read_movies_with_quoted_title() {
        let input = "movieId,title,genres\n\
                     1,Toy Story (1995),Adventure|Animation|Children\n\
                     11,\"American President, The (1995)\",Comedy|Drama|Romance\n";
        let movies = read_movies(input.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 11);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].genres, "Comedy|Drama|Romance");
    }

    #[test]
    fn test_read_movies_rejects_bad_id() {
        let input = "movieId,title,genres\nabc,Heat (1995),Action\n";
        let err = read_movies(input.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_ratings(Path::new("/definitely/not/here/ratings.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
