/// Package names from `pamac list --installed`, one package per line with
/// the name in the first column.
pub fn parse_pamac_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| !name.ends_with(':'))
        .map(str::to_string)
        .collect()
}
