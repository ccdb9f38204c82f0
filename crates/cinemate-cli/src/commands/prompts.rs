use cinemate_core::RatingWidget;
use cinemate_models::StarRating;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Select};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

const STAR_LABELS: [&str; 5] = ["Poor", "Fair", "Good", "Very good", "Excellent"];

fn star_items() -> Vec<String> {
    (StarRating::MIN..=StarRating::MAX)
        .zip(STAR_LABELS)
        .filter_map(|(stars, label)| StarRating::new(i64::from(stars)).ok().map(|r| (r, label)))
        .map(|(rating, label)| format!("{}  {}", rating.as_stars(), label))
        .collect()
}

fn rating_prompt(widget: &RatingWidget, title: &str) -> String {
    if widget.selection().is_none() {
        return format!("Rate {}", title);
    }
    let stars: String = (StarRating::MIN..=StarRating::MAX)
        .map(|position| if widget.is_lit(position) { '★' } else { '☆' })
        .collect();
    format!("Rate {} (currently {})", title, stars)
}

/// Let the user pick 1-5 stars for the widget's movie
///
/// Escape leaves the widget's selection untouched and returns false.
pub fn prompt_star_rating(widget: &mut RatingWidget, title: &str) -> Result<bool> {
    let default = widget
        .selection()
        .map(|r| usize::from(r.stars() - StarRating::MIN))
        .unwrap_or(2);

    let picked = Select::new()
        .with_prompt(rating_prompt(widget, title))
        .items(&star_items())
        .default(default)
        .interact_opt()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read rating: {}", e))?;

    match picked {
        Some(index) => {
            widget.select(index as i64 + i64::from(StarRating::MIN))?;
            Ok(true)
        }
        None => Ok(false),
    }
}
