//! BDD coverage for creating installation templates.

mod bdd_steps;
mod scenarios;
mod test_helpers;
