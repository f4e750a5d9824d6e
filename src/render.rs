//! Plain-text views of the lookup state and of a nutrition record.

use crate::app::AppState;
use crate::nutrition::{Macros, NutritionRecord};

pub const IDLE_TEXT: &str = "Know what you eat. Type a food to see its calories, macronutrients and health notes.";
pub const LOADING_TEXT: &str = "Analyzing nutritional composition...";
pub const NO_MACRO_DATA_TEXT: &str = "No macro data available";

const BAR_WIDTH: usize = 30;

/// Rounds away float noise such as 0.30000000000000004 for derived values.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn render_state(state: &AppState) -> String {
    match state {
        AppState::Idle => IDLE_TEXT.to_string(),
        AppState::Loading { .. } => LOADING_TEXT.to_string(),
        AppState::Failure(message) => format!("Error: {}", message),
        AppState::Success(record) => render_record(record),
    }
}

/// Full result view: header, calorie badge, macro chart, details and tips.
pub fn render_record(record: &NutritionRecord) -> String {
    let mut out = format!(
        "{}\nServing Size: {}\n{}\n\n[ {} Calories ]\n\nMacronutrients\n",
        record.food_name, record.serving_size, record.summary, record.calories
    );
    out.push_str(&render_macro_chart(&record.macros));

    out.push_str("\nNutrition Details\n");
    let rows = [
        ("Dietary Fiber", format!("{}g", record.details.fiber)),
        ("Sugar", format!("{}g", record.details.sugar)),
        ("Sodium", format!("{}mg", record.details.sodium)),
        ("Cholesterol", format!("{}mg", record.details.cholesterol)),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {:<16}{:>10}\n", label, value));
    }

    if !record.health_tips.is_empty() {
        out.push_str("\nKey Insights\n");
        for (index, tip) in record.health_tips.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, tip));
        }
    }

    out
}

/// Part-of-whole breakdown of the three macros with a total line.
pub fn render_macro_chart(macros: &Macros) -> String {
    if macros.is_empty() {
        return format!("  {}\n", NO_MACRO_DATA_TEXT);
    }

    let total = macros.total();
    let mut out = String::new();
    for (label, grams) in [("Protein", macros.protein), ("Carbs", macros.carbs), ("Fat", macros.fat)] {
        let share = grams / total;
        let filled = ((share * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        out.push_str(&format!(
            "  {:<8}{} {:>8} ({}%)\n",
            label,
            bar,
            format!("{}g", grams),
            (share * 100.0).round()
        ));
    }
    out.push_str(&format!("  Total: {}g\n", round2(total)));
    out
}
