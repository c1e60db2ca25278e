use crate::inventory::PackageRecord;

/// Parse the `Key : value` blocks printed by `pacman -Qi` and `pamac info`.
///
/// Blocks are separated by blank lines. Long values wrap onto lines indented
/// with whitespace; those are appended to the previous key.
pub fn parse_info_blocks(output: &str) -> Vec<PackageRecord> {
    let mut packages = Vec::new();
    let mut current: Option<PackageRecord> = None;
    let mut last_key = String::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            packages.extend(current.take());
            last_key.clear();
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(pkg) = current.as_mut() {
                apply_field(pkg, &last_key, line.trim(), true);
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == "Name" {
            packages.extend(current.take());
            current = Some(PackageRecord::new(value, ""));
        } else if let Some(pkg) = current.as_mut() {
            apply_field(pkg, key, value, false);
        }
        last_key = key.to_string();
    }

    packages.extend(current);
    packages
}

fn apply_field(pkg: &mut PackageRecord, key: &str, value: &str, continuation: bool) {
    match key {
        "Version" => pkg.version = value.to_string(),
        "Description" => {
            if continuation && !pkg.description.is_empty() {
                pkg.description.push(' ');
                pkg.description.push_str(value);
            } else {
                pkg.description = value.to_string();
            }
        }
        "Depends On" => {
            if value == "None" {
                return;
            }
            pkg.depends_on
                .extend(value.split_whitespace().map(str::to_string));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACMAN_QI: &str = "\
Name            : acl
Version         : 2.3.2-1
Description     : Access control list utilities, libraries and headers
Architecture    : x86_64
URL             : https://savannah.nongnu.org/projects/acl
Licenses        : LGPL
Depends On      : glibc  attr
Optional Deps   : None

Name            : base
Version         : 3-2
Description     : Minimal package set to define a basic Arch Linux installation
Depends On      : filesystem  gcc-libs  glibc  bash  coreutils  file
                  findutils  gawk  grep  procps-ng
Optional Deps   : linux: bare metal support
                  man-pages: manual pages

Name            : ca-certificates
Version         : 20220905-1
Description     : Common CA certificates (default providers)
Depends On      : None
";

    #[test]
    fn test_parses_every_block() {
        let packages = parse_info_blocks(PACMAN_QI);
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["acl", "base", "ca-certificates"]);
        assert_eq!(packages[0].version, "2.3.2-1");
        assert_eq!(
            packages[0].description,
            "Access control list utilities, libraries and headers"
        );
        assert_eq!(packages[0].depends_on, vec!["glibc", "attr"]);
    }

    #[test]
    fn test_wrapped_depends_are_joined() {
        let packages = parse_info_blocks(PACMAN_QI);
        assert_eq!(
            packages[1].depends_on,
            vec![
                "filesystem", "gcc-libs", "glibc", "bash", "coreutils", "file",
                "findutils", "gawk", "grep", "procps-ng",
            ]
        );
    }

    #[test]
    fn test_none_depends_is_empty() {
        let packages = parse_info_blocks(PACMAN_QI);
        assert!(packages[2].depends_on.is_empty());
    }

    #[test]
    fn test_value_containing_colon_is_kept_whole() {
        let packages = parse_info_blocks(
            "Name : vim\nVersion : 9.0.1\nDescription : Vi Improved: a highly configurable editor\n",
        );
        assert_eq!(packages.len(), 1);
        assert_eq!(
            packages[0].description,
            "Vi Improved: a highly configurable editor"
        );
    }
}
