use crate::inventory::PackageRecord;

/// Instruction for the first stage. Column and table names must match
/// `inventory::schema`.
pub const FORMULATION_PROMPT: &str = "You are a helpful assistant that generates SQL queries based on user input. \
Generate a valid SQLite query to fetch relevant packages from the packages table. \
The query must be a single SELECT statement in the following format: \
SELECT name, version, description FROM packages WHERE name LIKE '%keyword%' \
Replace 'keyword' with the most relevant tool or package keyword from the user input. \
User input will be a natural language question about a command on this system. \
Respond with a JSON object of the form {\"query\": \"<the SQL query>\"}.";

const RESPONSE_FORMAT: &str = "Respond with a JSON object of the form \
{\"command\": \"<the suggested command>\", \"explanation\": \"<what it does>\"}.";

pub fn grounded_prompt(packages: &[PackageRecord], package_manager: &str) -> String {
    let summaries = packages
        .iter()
        .map(PackageRecord::summary)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful assistant that suggests Linux commands based on the following system info:\n\
         Relevant Installed Packages:\n{}\n\
         The package manager in use is {}. \
         Ensure the response is relevant to the user's query and provides accurate information. {}",
        summaries, package_manager, RESPONSE_FORMAT
    )
}

pub fn fallback_prompt(reason: &str, package_manager: &str) -> String {
    format!(
        "{}\n\
         The package manager in use is {}. \
         Please suggest the most appropriate Linux command based on the user's query and package manager. {}",
        reason, package_manager, RESPONSE_FORMAT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounded_prompt_lists_each_package() {
        let packages = vec![
            PackageRecord::new("git", "2.43.0").with_description("revision control"),
            PackageRecord::new("tig", "2.5.8"),
        ];
        let prompt = grounded_prompt(&packages, "pacman");
        assert!(prompt.contains("git: 2.43.0, Description: revision control\n"));
        assert!(prompt.contains("tig: 2.5.8, Description: No description available\n"));
        assert!(prompt.contains("The package manager in use is pacman."));
    }

    #[test]
    fn test_fallback_prompt_leads_with_reason() {
        let prompt = fallback_prompt("No relevant packages found.", "dpkg");
        assert!(prompt.starts_with("No relevant packages found.\n"));
        assert!(prompt.contains("dpkg"));
        assert!(!prompt.contains("Relevant Installed Packages"));
    }

    #[test]
    fn test_formulation_prompt_names_real_columns() {
        assert!(FORMULATION_PROMPT.contains("FROM packages"));
        assert!(FORMULATION_PROMPT.contains("name, version, description"));
    }
}
