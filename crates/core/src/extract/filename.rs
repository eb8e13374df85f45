use regex::Regex;

use crate::model::FileMatch;

/// Report file names open with the client code: digits, optional space,
/// then a dash ("12-acme.pdf", "12 - acme.pdf").
const CODE_PATTERN: &str = r"^(\d+)\s*-";

/// Pull client codes out of a list of file names, in input order. Names
/// that do not open with a code are skipped.
pub fn scan(files: &[String]) -> Vec<FileMatch> {
    let code_re = Regex::new(CODE_PATTERN).unwrap();

    files
        .iter()
        .filter_map(|name| {
            code_re.captures(name).map(|caps| FileMatch {
                code: caps[1].to_string(),
                file_name: name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_both_dash_spacings() {
        let found = scan(&names(&["12-acme.pdf", "34 - initech.pdf"]));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].code, "12");
        assert_eq!(found[1].code, "34");
        assert_eq!(found[1].file_name, "34 - initech.pdf");
    }

    #[test]
    fn skips_names_without_a_leading_code() {
        let found = scan(&names(&["relatorio.pdf", "acme-12.pdf", "-12.pdf"]));
        assert!(found.is_empty());
    }

    #[test]
    fn code_must_open_the_name() {
        let found = scan(&names(&[" 12-acme.pdf"]));
        assert!(found.is_empty());
    }

    #[test]
    fn keeps_input_order() {
        let found = scan(&names(&["2-b.pdf", "1-a.pdf"]));
        let codes: Vec<&str> = found.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, ["2", "1"]);
    }
}
