//! Suite Planner
//!
//! Decides which module names are handed to the loader.
//!
//! - Names given on the command line keep their order (it becomes the
//!   discovery order); unknown names are kept so the loader reports them.
//! - Without names, every registered module is selected, sorted by name.
//! - A regex filter narrows either list.

use regex::Regex;

/// Module names to load, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Selected module names
    pub modules: Vec<String>,
}

/// Build the plan from requested and registered module names
pub fn build_plan<'a>(
    requested: &[String],
    registered: impl IntoIterator<Item = &'a str>,
    filter: Option<&Regex>,
) -> ExecutionPlan {
    let candidates: Vec<String> = if requested.is_empty() {
        let mut names: Vec<String> = registered.into_iter().map(str::to_string).collect();
        names.sort();
        names.dedup();
        names
    } else {
        requested.to_vec()
    };

    let modules = candidates
        .into_iter()
        .filter(|name| filter.is_none_or(|re| re.is_match(name)))
        .collect();

    ExecutionPlan { modules }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_registered_sorted_by_default() {
        let plan = build_plan(&[], ["smoothing", "factorial", "fibonacci"], None);
        assert_eq!(plan.modules, names(&["factorial", "fibonacci", "smoothing"]));
    }

    #[test]
    fn test_requested_order_is_kept() {
        let plan = build_plan(
            &names(&["smoothing", "missing", "factorial"]),
            ["factorial", "smoothing"],
            None,
        );
        assert_eq!(plan.modules, names(&["smoothing", "missing", "factorial"]));
    }

    #[test]
    fn test_filter_narrows_selection() {
        let re = Regex::new("^f").unwrap();
        let plan = build_plan(&[], ["smoothing", "factorial", "fibonacci"], Some(&re));
        assert_eq!(plan.modules, names(&["factorial", "fibonacci"]));

        let re = Regex::new("sort").unwrap();
        let plan = build_plan(&[], ["smoothing"], Some(&re));
        assert!(plan.modules.is_empty());
    }
}
