use chrono::{NaiveDate, Utc};

use crate::{error, info, weeks::LifeInWeeks};

pub fn weeks(birth_date: String, target_age: u32, title: String) {
    let birth = match NaiveDate::parse_from_str(&birth_date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => error!("Invalid birth date '{}', expected YYYY-MM-DD: {}", birth_date, e),
    };

    let Some(life) = LifeInWeeks::new(birth, target_age, Utc::now().date_naive()) else {
        error!("Target age {} is out of range", target_age);
    };

    info!("Total weeks in {} years: {}", target_age, life.total_weeks);
    info!("Current week: {}", life.current_week);
    println!();
    print!("{}", life.render(&title));
}
