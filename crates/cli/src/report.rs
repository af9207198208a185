//! Plain-text rendering shared by the interactive menu and the one-shot
//! subcommands.

use std::io::{self, Write};

use reelshelf_core::{
    stats::{self, MovieFilter, SortOrder, StatsError},
    FuzzyMatcher, MatchOutcome, Movie, Snapshot,
};

pub fn write_list<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "{} movies in total", snapshot.len())?;
    writeln!(out)?;
    for movie in snapshot {
        writeln!(
            out,
            "{} ({}), Rating: {:.1}",
            movie.title, movie.year, movie.rating
        )?;
    }
    Ok(())
}

pub fn write_stats<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let summary = match stats::rating_stats(snapshot) {
        Ok(summary) => summary,
        Err(StatsError::EmptyCatalog) => return write_empty(out),
    };

    writeln!(out, "Average rating: {:.1}", summary.mean)?;
    writeln!(out, "Median rating: {:.1}", summary.median)?;
    for title in &summary.best {
        writeln!(out, "Best movie: {}, {:.1}", title, summary.best_rating)?;
    }
    for title in &summary.worst {
        writeln!(out, "Worst movie: {}, {:.1}", title, summary.worst_rating)?;
    }
    Ok(())
}

pub fn write_random<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    match stats::random_movie(snapshot) {
        Ok(movie) => writeln!(
            out,
            "Your movie for tonight: {} ({}), it's rated {:.1}",
            movie.title, movie.year, movie.rating
        ),
        Err(StatsError::EmptyCatalog) => write_empty(out),
    }
}

pub fn write_search<W: Write>(
    out: &mut W,
    matcher: &FuzzyMatcher,
    query: &str,
    snapshot: &Snapshot,
) -> io::Result<()> {
    match matcher.resolve_in(query, snapshot) {
        MatchOutcome::Definitive(title) => match snapshot.get(&title) {
            Some(movie) => writeln!(
                out,
                "{} ({}), rating {:.1}",
                movie.title, movie.year, movie.rating
            ),
            None => writeln!(out, "{}", title),
        },
        MatchOutcome::Suggestions(titles) => {
            writeln!(out, "The movie \"{}\" does not exist. Did you mean:", query)?;
            for title in titles {
                writeln!(out, "{}", title)?;
            }
            Ok(())
        }
        MatchOutcome::NoMatch => writeln!(out, "No movies match \"{}\".", query),
    }
}

pub fn write_sorted_by_rating<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    write_rated(out, &stats::sorted_by_rating(snapshot, SortOrder::Descending))
}

pub fn write_sorted_by_year<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    order: SortOrder,
) -> io::Result<()> {
    for movie in stats::sorted_by_year(snapshot, order) {
        writeln!(out, "{} ({})", movie.title, movie.year)?;
    }
    Ok(())
}

pub fn write_filtered<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    filter: &MovieFilter,
) -> io::Result<()> {
    let movies = stats::filter_movies(snapshot, filter);
    if movies.is_empty() {
        return writeln!(out, "No movies match your filters.");
    }

    writeln!(out, "Filtered Movies:")?;
    write_rated(out, &movies)
}

fn write_rated<W: Write>(out: &mut W, movies: &[Movie]) -> io::Result<()> {
    for movie in movies {
        writeln!(out, "{} ({}): {:.1}", movie.title, movie.year, movie.rating)?;
    }
    Ok(())
}

fn write_empty<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "No movies in the database.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelshelf_core::testing::fixtures;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list() {
        let snapshot = fixtures::snapshot(&[("Heat", 1995, 8.3), ("Alien", 1979, 8.0)]);
        let text = render(|out| write_list(out, &snapshot));
        assert_eq!(
            text,
            "2 movies in total\n\nHeat (1995), Rating: 8.3\nAlien (1979), Rating: 8.0\n"
        );
    }

    #[test]
    fn test_stats_lists_every_tied_title() {
        let snapshot = fixtures::snapshot(&[
            ("Heat", 1995, 9.0),
            ("Alien", 1979, 9.0),
            ("Ronin", 1998, 6.0),
        ]);
        let text = render(|out| write_stats(out, &snapshot));
        assert!(text.contains("Average rating: 8.0\n"));
        assert!(text.contains("Median rating: 9.0\n"));
        assert!(text.contains("Best movie: Heat, 9.0\nBest movie: Alien, 9.0\n"));
        assert!(text.contains("Worst movie: Ronin, 6.0\n"));
    }

    #[test]
    fn test_stats_and_random_on_empty_catalog() {
        let snapshot = Snapshot::default();
        assert_eq!(
            render(|out| write_stats(out, &snapshot)),
            "No movies in the database.\n"
        );
        assert_eq!(
            render(|out| write_random(out, &snapshot)),
            "No movies in the database.\n"
        );
    }

    #[test]
    fn test_search_outcomes() {
        let snapshot = fixtures::snapshot(&[
            ("Star Wars", 1977, 8.6),
            ("Star Trek", 2009, 7.9),
            ("Avatar", 2009, 7.8),
        ]);
        let matcher = FuzzyMatcher::new();

        let exact = render(|out| write_search(out, &matcher, "STAR WARS", &snapshot));
        assert_eq!(exact, "Star Wars (1977), rating 8.6\n");

        let fuzzy = render(|out| write_search(out, &matcher, "Str Wras", &snapshot));
        assert!(fuzzy.starts_with("The movie \"Str Wras\" does not exist. Did you mean:\nStar Wars\n"));
        assert!(!fuzzy.contains("Avatar"));

        let none = render(|out| write_search(out, &matcher, "Blade Runner", &snapshot));
        assert_eq!(none, "No movies match \"Blade Runner\".\n");
    }

    #[test]
    fn test_sorted_and_filtered() {
        let snapshot = fixtures::snapshot(&[
            ("Heat", 1995, 8.3),
            ("Alien", 1979, 8.5),
            ("Ronin", 1998, 6.9),
        ]);

        let by_rating = render(|out| write_sorted_by_rating(out, &snapshot));
        assert_eq!(
            by_rating,
            "Alien (1979): 8.5\nHeat (1995): 8.3\nRonin (1998): 6.9\n"
        );

        let by_year = render(|out| write_sorted_by_year(out, &snapshot, SortOrder::Descending));
        assert_eq!(by_year, "Ronin (1998)\nHeat (1995)\nAlien (1979)\n");

        let filter = MovieFilter {
            min_rating: Some(8.0),
            ..Default::default()
        };
        let filtered = render(|out| write_filtered(out, &snapshot, &filter));
        assert_eq!(
            filtered,
            "Filtered Movies:\nHeat (1995): 8.3\nAlien (1979): 8.5\n"
        );

        let nothing = MovieFilter {
            start_year: Some(2020),
            ..Default::default()
        };
        assert_eq!(
            render(|out| write_filtered(out, &snapshot, &nothing)),
            "No movies match your filters.\n"
        );
    }
}
