use maud::{Markup, html};

use crate::error::CaddyError;
use crate::model::{CaddyResponse, Impact, QuickAdvice};

fn impact_class(impact: Impact) -> &'static str {
    match impact {
        Impact::Positive => "factor-positive",
        Impact::Negative => "factor-negative",
        Impact::Neutral => "factor-neutral",
    }
}

#[must_use]
pub fn render_advice_card(response: &CaddyResponse) -> Markup {
    let advice = &response.advice;
    let rec = &advice.recommendation;
    let analysis = &advice.analysis;
    let risk = analysis.risk_assessment.to_string();
    html! {
        div class="caddy-advice" data-personalized=(response.personalized.to_string()) {
            h2 class="primary-club" { (rec.primary_club) }
            p class="reasoning" { (rec.reasoning) }
            @if !rec.alternative_clubs.is_empty() {
                p class="alternatives" {
                    "Also consider: " (rec.alternative_clubs.join(", "))
                }
            }
            table class="shot-summary" {
                tr { th { "Plays like" } td { (rec.adjusted_distance) " yds" } }
                tr { th { "Confidence" } td { (format!("{:.0}%", rec.confidence * 100.0)) } }
                tr { th { "Difficulty" } td { (analysis.difficulty_rating) "/10" } }
                tr { th { "Risk" } td class={ "risk-" (risk) } { (risk) } }
                tr { th { "Expected strokes" } td { (analysis.expected_strokes) } }
                tr { th { "With this club" } td { (analysis.recommended_strokes) } }
            }
            @if let Some(aim) = &rec.aim_adjustment {
                p class="aim" { (aim) }
            }
            @if let Some(thought) = &rec.swing_thought {
                p class="swing-thought" { "Swing thought: " (thought) }
            }
            ul class="factors" {
                @for factor in &analysis.factors {
                    li class=(impact_class(factor.impact)) {
                        span class="factor-name" { (factor.factor) }
                        " "
                        (factor.description)
                    }
                }
            }
            @if let Some(strategy) = &advice.alternative_strategy {
                p class="strategy" { (strategy) }
            }
            @if let Some(note) = &advice.personal_note {
                p class="personal-note" { (note) }
            }
            @if let Some(insight) = &advice.personal_insight {
                p class="personal-insight" { (insight) }
            }
            @if let Some(desc) = &advice.confidence_description {
                p class="confidence-description" { (desc) }
            }
        }
    }
}

#[must_use]
pub fn render_quick_advice(advice: &QuickAdvice) -> Markup {
    html! {
        div class="caddy-quick" {
            h2 class="primary-club" { (advice.club) }
            p class="reasoning" { (advice.reasoning) }
        }
    }
}

#[must_use]
pub fn render_error(err: &CaddyError) -> Markup {
    html! {
        div class="caddy-error" data-code=(err.code.to_string()) {
            p class="message" { (err.message) }
            p class="suggestion" { (err.suggestion) }
        }
    }
}
