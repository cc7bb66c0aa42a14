use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::ContributionFrequency;

pub struct ContributionScheduler;

impl ContributionScheduler {
    /// Whether a contribution is injected on `date`.
    ///
    /// Weekly contributions land on Mondays, monthly ones on the 1st and
    /// yearly ones on January 1st.
    pub fn is_contribution_due(date: NaiveDate, frequency: ContributionFrequency) -> bool {
        match frequency {
            ContributionFrequency::Daily => true,
            ContributionFrequency::Weekly => date.weekday() == Weekday::Mon,
            ContributionFrequency::Monthly => date.day() == 1,
            ContributionFrequency::Yearly => date.month() == 1 && date.day() == 1,
            ContributionFrequency::None => false,
        }
    }
}
