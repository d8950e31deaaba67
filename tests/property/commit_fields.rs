//! Property-based tests for commit line parsing

use proptest::prelude::*;
use reftree::{CommitRecord, ParseError};

/// Title survives any number of embedded commas
#[test]
fn test_title_rejoin_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let field = "[^,\r\n]{0,12}";

    runner
        .run(
            &(
                "[0-9a-f]{1,40}",
                prop::collection::vec("[0-9a-f]{1,8}", 0..4),
                prop::collection::vec(field, 6),
                "[^\r\n]{0,60}",
            ),
            |(sha, parents, fields, title)| {
                let line = format!(
                    "{},tree,{},{},{}",
                    sha,
                    parents.join(" "),
                    fields.join(","),
                    title
                );
                let record = CommitRecord::parse(&line).unwrap();

                prop_assert_eq!(&record.sha, &sha);
                prop_assert_eq!(&record.parents, &parents);
                prop_assert_eq!(&record.title, &title);
                prop_assert_eq!(record.author_name.as_str(), fields[0].as_str());
                prop_assert_eq!(record.committer_date.as_str(), fields[5].as_str());
                Ok(())
            },
        )
        .unwrap();
}

proptest! {
    /// Anything with fewer than ten fields is rejected with its field count
    #[test]
    fn short_lines_are_malformed(fields in prop::collection::vec("[^,\r\n]{1,8}", 1..10)) {
        let line = fields.join(",");
        prop_assert_eq!(
            CommitRecord::parse(&line),
            Err(ParseError::MalformedRecord { expected: 10, found: fields.len() })
        );
    }
}
