use crate::inventory::PackageRecord;

/// Parse `apt list --installed`. The listing carries no descriptions or
/// dependencies, only `name/suites version arch [flags]`.
pub fn parse_apt_list(output: &str) -> Vec<PackageRecord> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (name, rest) = line.split_once('/')?;
            let version = rest.split_whitespace().nth(1)?;
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            Some(PackageRecord::new(name, version))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_listing_and_skips_header() {
        let output = "Listing... Done\n\
adduser/jammy,now 3.118ubuntu5 all [installed]\n\
curl/jammy-updates,jammy-security,now 7.81.0-1ubuntu1.15 amd64 [installed,automatic]\n\
\n";
        let packages = parse_apt_list(output);
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].name, "curl");
        assert_eq!(packages[1].version, "7.81.0-1ubuntu1.15");
        assert!(packages[1].description.is_empty());
    }

    #[test]
    fn test_ignores_warning_lines() {
        let output = "WARNING: apt does not have a stable CLI interface. Use with caution in scripts.\n";
        assert!(parse_apt_list(output).is_empty());
    }
}
