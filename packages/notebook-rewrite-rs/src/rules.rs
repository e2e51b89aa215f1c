use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::scan::first_match;

pub(crate) const PROJECT_OVERVIEW: &str = "## Project Overview\n\n\
- Problem: Estimate residential property values in Boston using neighborhood, accessibility, and housing features.\n\
- Solution: Build a multivariable regression model, prepare features, evaluate fit, and iterate with transformations.\n\
- Impact: Support pricing, investment screening, and scenario analysis for real estate decisions.\n";

/// A test over one markdown cell's text.
#[derive(Debug)]
pub enum CellPredicate {
    /// Substring of the lowercased text.
    Contains(&'static str),
    /// Every substring present in the lowercased text.
    ContainsAll(&'static [&'static str]),
    /// Line-anchored markdown heading of any level starting with a keyword.
    Heading(Regex),
}

impl CellPredicate {
    fn heading(keyword: &str) -> Self {
        let pattern = format!(r"^\s*#+\s*{}\b", regex::escape(keyword));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .expect("invalid heading regex");
        Self::Heading(regex)
    }

    /// `original` is the text as written, `lowered` its lowercase form.
    pub fn matches(&self, original: &str, lowered: &str) -> bool {
        match self {
            Self::Contains(needle) => lowered.contains(needle),
            Self::ContainsAll(needles) => needles.iter().all(|needle| lowered.contains(needle)),
            Self::Heading(regex) => regex.is_match(original),
        }
    }
}

/// Replaces a whole markdown cell when any of its predicates holds.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: &'static str,
    pub any_of: Vec<CellPredicate>,
    pub replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, any_of: Vec<CellPredicate>, replacement: &'static str) -> Self {
        Self {
            name,
            any_of,
            replacement,
        }
    }

    pub fn matches(&self, original: &str, lowered: &str) -> bool {
        self.any_of
            .iter()
            .any(|predicate| predicate.matches(original, lowered))
    }
}

/// Section rewrites in priority order. Earlier entries win.
pub static MARKDOWN_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    use CellPredicate::{Contains, ContainsAll};

    vec![
        RewriteRule::new(
            "project-overview",
            vec![Contains("### introduction"), Contains("# setup and context")],
            PROJECT_OVERVIEW,
        ),
        RewriteRule::new(
            "environment-note",
            vec![Contains("upgrade plotly"), Contains("google colab")],
            "## Environment Note\n\n\
This project uses Plotly for interactive visuals. Manage package versions with your environment manager (e.g., pip).",
        ),
        RewriteRule::new(
            "dependencies",
            vec![Contains("import statements")],
            "## Dependencies\n\nImport core libraries used for data preparation, modeling, and visualization.",
        ),
        RewriteRule::new(
            "display-settings",
            vec![Contains("notebook presentation")],
            "## Display Settings\n\nTweak display precision for cleaner tables and summaries.",
        ),
        RewriteRule::new(
            "load-data",
            vec![Contains("load the data")],
            "## Load Data\n\n\
Load the Boston housing dataset from CSV. The first column contains row indices and is used as the index.",
        ),
        RewriteRule::new(
            "dataset-overview",
            vec![
                Contains("understand the boston house price dataset"),
                ContainsAll(&["dataset", "characteristics"]),
            ],
            "## Dataset Overview\n\n\
The dataset captures neighborhood metrics (e.g., crime rate, industry share), accessibility (highway access, river proximity), \n\
environmental factors (nitric oxides), and housing attributes (rooms, age, student\u{2013}teacher ratio). The target is median home price.",
        ),
        RewriteRule::new(
            "initial-exploration",
            vec![Contains("preliminary data exploration")],
            "## Initial Exploration\n\n\
We profile the dataset: size, columns, and basic integrity checks (missing values, duplicates) to ensure reliable modeling.",
        ),
        RewriteRule::new(
            "descriptive-statistics",
            vec![Contains("descriptive statistics")],
            "## Descriptive Statistics\n\n\
Summarize key indicators that influence valuation (e.g., student\u{2013}teacher ratio, rooms, price levels, river proximity).",
        ),
        RewriteRule::new(
            "feature-distributions",
            vec![
                Contains("visualise the features"),
                Contains("visualize the features"),
            ],
            "## Feature Distributions\n\n\
Explore distributions to spot skew, outliers, and modality. This informs transformations and model expectations.",
        ),
        RewriteRule::new(
            "target-price",
            vec![Contains("house prices")],
            "### Target Variable: Price\n\n\
We review price distribution to understand scale and potential skew before modeling.",
        ),
        RewriteRule::new(
            "commute-distance",
            vec![Contains("distance to employment")],
            "### Commute Distance (DIS)\n\n\
Shorter commutes often correlate with higher demand. Visualizing DIS helps gauge its distribution.",
        ),
        RewriteRule::new(
            "rooms",
            vec![Contains("number of rooms")],
            "### Rooms (RM)\n\n\
Room count is a core driver of value. We inspect its distribution for range and spread.",
        ),
        RewriteRule::new(
            "highway-access",
            vec![Contains("access to highways")],
            "### Highway Access (RAD)\n\n\
Access can affect desirability and price; we assess its distribution.",
        ),
        RewriteRule::new(
            "river-proximity",
            vec![
                Contains("next to the river"),
                ContainsAll(&["river", "chas"]),
            ],
            "### Proximity to the Charles River (CHAS)\n\n\
We compare counts by river proximity to see whether location near the river is common or rare.",
        ),
        RewriteRule::new(
            "feature-relationships",
            vec![Contains("understand the relationships")],
            "## Relationships Between Features\n\n\
We examine feature interactions to anticipate multicollinearity and non-linear effects.",
        ),
        RewriteRule::new(
            "pair-plot",
            vec![Contains("run a pair plot")],
            "### Pair Plot\n\n\
Pairwise charts reveal linear trends, clusters, and potential interactions across predictors and the target.",
        ),
        RewriteRule::new(
            "joint-plots",
            vec![Contains("jointplot")],
            "### Joint Plots for Key Pairs\n\n\
We zoom into selected relationships (e.g., DIS\u{2013}NOX, INDUS\u{2013}NOX, LSTAT\u{2013}RM, LSTAT\u{2013}PRICE, RM\u{2013}PRICE) to inspect form and spread.",
        ),
        RewriteRule::new(
            "predicted-values",
            vec![
                Contains("analyse the estimated values"),
                Contains("analyze the estimated values"),
            ],
            "### Predicted Values and Residuals\n\n\
We evaluate model fit beyond R\u{b2} by inspecting residuals for randomness, mean near zero, and low skew.",
        ),
        RewriteRule::new(
            "log-transformation",
            vec![Contains("data transformations")],
            "### Log Transformation to Improve Fit\n\n\
If residuals show skew or heteroscedasticity, we apply a log transform to stabilize variance and improve linearity.",
        ),
        RewriteRule::new(
            "log-effect",
            vec![Contains("how does the log transformation work")],
            "#### Effect of Log Transformation\n\n\
Log compresses large values more than small ones, often producing a more symmetric distribution helpful for linear models.",
        ),
        RewriteRule::new(
            "log-regression",
            vec![Contains("regression using log prices")],
            "## Regression with Log Prices\n\n\
Refit using log-transformed prices, then compare fit and diagnostics to the original specification.",
        ),
        RewriteRule::new(
            "log-coefficients",
            vec![
                Contains("evaluating coefficients"),
                ContainsAll(&["coefficients", "log prices"]),
            ],
            "## Interpreting Coefficients (Log Prices)\n\n\
We examine coefficient signs and magnitudes to confirm expectations (e.g., RM positive, NOX negative) and interpret practical effects.",
        ),
        RewriteRule::new(
            "residual-comparisons",
            vec![Contains("residual plots")],
            "## Residual Comparisons\n\n\
Compare residual patterns for linear vs. log-price models to assess improvements in symmetry and variance.",
        ),
        RewriteRule::new(
            "out-of-sample",
            vec![
                Contains("out of sample performance"),
                Contains("compare out of sample"),
            ],
            "## Out-of-Sample Performance\n\n\
We compare R\u{b2} (or other metrics) on the test set to validate generalization and choose the stronger model.",
        ),
        RewriteRule::new(
            "scenario-valuation",
            vec![
                Contains("predict a property's value"),
                Contains("predict a property"),
            ],
            "## Scenario-Based Valuation\n\n\
Using the fitted model, we estimate value for baseline (average) features and explore alternative scenarios by adjusting inputs.",
        ),
        RewriteRule::new(
            "multivariable-regression",
            vec![CellPredicate::heading("Multivariable Regression")],
            "# Multivariable Regression\n\n\
We fit a linear model with multiple predictors to quantify how each feature contributes to property value.",
        ),
        RewriteRule::new(
            "baseline-model",
            vec![CellPredicate::heading("Run Your First Regression")],
            "### Fit the Baseline Model\n\n\
Train a linear regression on the training set and review in-sample performance (e.g., R\u{b2}).",
        ),
        RewriteRule::new(
            "coefficient-check",
            vec![CellPredicate::heading("Evaluate the Coefficients")],
            "### Coefficient Sanity Check\n\n\
Confirm coefficient signs align with expectations (e.g., RM positive, NOX negative) and inspect magnitudes.",
        ),
        RewriteRule::new(
            "average-property",
            vec![Contains("predict how much the average property")],
            "We estimate the value for an average property and convert log predictions back to dollar values for interpretation.",
        ),
        RewriteRule::new(
            "adjusted-scenario",
            vec![ContainsAll(&["keeping the average values", "value a property"])],
            "We create a scenario by adjusting selected features while keeping others at their average to illustrate valuation impact.",
        ),
    ]
});

/// Returns the rule that claims `text`, if any.
pub fn matching_rule(text: &str) -> Option<&'static RewriteRule> {
    let lowered = text.to_lowercase();
    first_match(MARKDOWN_RULES.iter(), |rule| {
        rule.matches(text, &lowered).then_some(rule)
    })
    .map(|(_, rule)| rule)
}

/// Swaps the whole cell for the canned section of the first matching rule,
/// or hands `text` back untouched.
pub fn replace_section(text: &str) -> String {
    match matching_rule(text) {
        Some(rule) => {
            tracing::debug!(rule = rule.name, "markdown section replaced");
            rule.replacement.to_string()
        }
        None => text.to_string(),
    }
}
