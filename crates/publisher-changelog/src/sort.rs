//! Release ordering of commits

use std::cmp::Ordering;

use publisher_core::types::Commit;

fn rank(commit: &Commit) -> u8 {
    match commit.subject.as_deref() {
        Some("build") => 3,
        Some("ci") => 2,
        None => 1,
        Some(_) => 0,
    }
}

fn compare(a: &Commit, b: &Commit) -> Ordering {
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.message.to_lowercase().cmp(&b.message.to_lowercase()))
        .then_with(|| a.message.cmp(&b.message))
}

/// Sort annotated commits into release order.
///
/// Headered commits come first, then commits without a header, then `ci`,
/// then `build`. Messages break ties case-insensitively; the sort is stable.
pub fn sort_commits(commits: &mut [Commit]) {
    commits.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CommitParser, ConventionalParser};
    use chrono::Utc;

    fn commits(messages: &[&str]) -> Vec<Commit> {
        let parser = ConventionalParser::new();
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let mut c = Commit::new(i.to_string(), *m, "dev", Utc::now());
                parser.annotate(&mut c);
                c
            })
            .collect()
    }

    fn messages(commits: &[Commit]) -> Vec<&str> {
        commits.iter().map(|c| c.message.as_str()).collect()
    }

    #[test]
    fn test_rank_order() {
        let mut list = commits(&[
            "build: bump toolchain",
            "plain note",
            "ci: cache deps",
            "fix: crash",
        ]);
        sort_commits(&mut list);
        assert_eq!(
            messages(&list),
            ["fix: crash", "plain note", "ci: cache deps", "build: bump toolchain"]
        );
    }

    #[test]
    fn test_ties_compare_case_insensitively() {
        let mut list = commits(&["fix: b", "Feat: a", "feat: c"]);
        sort_commits(&mut list);
        assert_eq!(messages(&list), ["Feat: a", "feat: c", "fix: b"]);
    }

    #[test]
    fn test_identical_messages_keep_order() {
        let mut list = commits(&["fix: same", "fix: same"]);
        list[0].hash = "first".to_string();
        list[1].hash = "second".to_string();
        sort_commits(&mut list);
        assert_eq!(list[0].hash, "first");
    }
}
