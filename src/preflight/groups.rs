//! Group database parsing.
//!
//! Lines in `/etc/group` look like `docker:x:999:alice,bob`. Only the name
//! (first field) and the member list (fourth field) matter here.

/// One parsed group database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    /// Group name.
    pub name: String,
    /// Supplementary members listed in the fourth field.
    pub members: Vec<String>,
}

impl GroupEntry {
    /// Parse a single `name:password:gid:members` line.
    ///
    /// Returns `None` for blank lines and comments. Lines with fewer than four
    /// fields still yield an entry, with no members.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return None;
        }

        let fields: Vec<&str> = line.split(':').collect();
        let name = fields[0].trim();
        if name.is_empty() {
            return None;
        }

        let members = fields
            .get(3)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            members,
        })
    }

    /// Whether `user` is listed as a member.
    pub fn has_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }
}

/// Find the entry whose name is exactly `group`.
///
/// Groups that merely share a prefix (`dockerroot` when looking for `docker`)
/// do not match.
pub fn find_group(text: &str, group: &str) -> Option<GroupEntry> {
    text.lines()
        .filter_map(GroupEntry::parse)
        .find(|entry| entry.name == group)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP_FILE: &str = "\
root:x:0:
dockerroot:x:980:mallory
docker:x:999:alice, bob ,carol
wheel:x:10:alice
";

    #[test]
    fn finds_exact_group() {
        let entry = find_group(GROUP_FILE, "docker").unwrap();
        assert_eq!(entry.name, "docker");
        assert_eq!(entry.members, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn ignores_prefix_match() {
        let entry = find_group(GROUP_FILE, "docker").unwrap();
        assert!(!entry.has_member("mallory"));
    }

    #[test]
    fn missing_group_is_none() {
        assert!(find_group(GROUP_FILE, "podman").is_none());
    }

    #[test]
    fn empty_member_list() {
        let entry = find_group(GROUP_FILE, "root").unwrap();
        assert!(entry.members.is_empty());
        assert!(!entry.has_member("root"));
    }

    #[test]
    fn short_line_has_no_members() {
        let entry = GroupEntry::parse("docker:x").unwrap();
        assert_eq!(entry.name, "docker");
        assert!(entry.members.is_empty());
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert!(GroupEntry::parse("").is_none());
        assert!(GroupEntry::parse("   ").is_none());
        assert!(GroupEntry::parse("# comment").is_none());
    }

    #[test]
    fn tolerates_crlf() {
        let entry = find_group("docker:x:999:alice\r\n", "docker").unwrap();
        assert!(entry.has_member("alice"));
    }

    #[test]
    fn member_match_is_exact() {
        let entry = GroupEntry::parse("docker:x:999:alice2").unwrap();
        assert!(!entry.has_member("alice"));
    }
}
