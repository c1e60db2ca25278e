use crate::inventory::PackageRecord;

/// Tab-separated so multi-word summaries survive. The status column lets us
/// skip packages that were removed but left config files behind.
pub(super) const QUERY_FORMAT: &str =
    "-f=${db:Status-Abbrev}\t${Package}\t${Version}\t${binary:Summary}\t${Depends}\n";

/// Parse `dpkg-query -W` output produced with [`QUERY_FORMAT`].
pub fn parse_dpkg_query(output: &str) -> Vec<PackageRecord> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?;
            let name = fields.next()?.trim();
            let version = fields.next()?.trim();
            let summary = fields.next().unwrap_or("").trim();
            let depends = fields.next().unwrap_or("").trim();

            // second status letter is the current state; 'i' = installed
            if status.chars().nth(1) != Some('i') || name.is_empty() {
                return None;
            }

            Some(
                PackageRecord::new(name, version)
                    .with_description(summary)
                    .with_depends_on(
                        depends
                            .split(',')
                            .map(str::trim)
                            .filter(|d| !d.is_empty()),
                    ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ii \tadduser\t3.118ubuntu5\tadd and remove users and groups\tpasswd, debconf (>= 0.5) | debconf-2.0\n\
ii \tcoreutils\t8.32-4.1ubuntu1\tGNU core utilities\t\n\
rc \told-thing\t1.0\tremoved but configured\tlibc6\n\
ii \tgit\t1:2.34.1-1ubuntu1\tfast, scalable, distributed revision control system\tlibc6 (>= 2.34), perl, zlib1g\n";

    #[test]
    fn test_parses_installed_packages() {
        let packages = parse_dpkg_query(SAMPLE);
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["adduser", "coreutils", "git"]);

        let git = &packages[2];
        assert_eq!(git.version, "1:2.34.1-1ubuntu1");
        assert_eq!(git.description, "fast, scalable, distributed revision control system");
        assert_eq!(git.depends_on, vec!["libc6 (>= 2.34)", "perl", "zlib1g"]);
    }

    #[test]
    fn test_empty_depends_yields_empty_list() {
        let packages = parse_dpkg_query(SAMPLE);
        assert!(packages[1].depends_on.is_empty());
        assert_eq!(packages[0].depends_on, vec!["passwd", "debconf (>= 0.5) | debconf-2.0"]);
    }

    #[test]
    fn test_ignores_malformed_lines() {
        assert!(parse_dpkg_query("garbage\n\nii \tonly-name\n").is_empty());
    }
}
