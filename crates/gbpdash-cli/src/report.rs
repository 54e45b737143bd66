//! Reporting command handlers: text/JSON snapshot and CSV export.

use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_analytics::AnalyticsSnapshot;
use gbpdash_core::Period;

fn parse_period(period: &str) -> anyhow::Result<Period> {
    period.parse::<Period>().map_err(|e| anyhow::anyhow!(e))
}

pub(crate) async fn run_report(
    pool: &PgPool,
    user: Uuid,
    period: &str,
    profile: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let period = parse_period(period)?;
    let snapshot = gbpdash_analytics::get_analytics_data(pool, user, period, profile).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

pub(crate) async fn run_export(
    pool: &PgPool,
    user: Uuid,
    period: &str,
    profile: Option<i64>,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let period = parse_period(period)?;
    let csv = gbpdash_analytics::export_analytics_data(pool, user, period, profile).await?;
    match output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            println!("wrote {} byte(s) to {}", csv.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn print_snapshot(snapshot: &AnalyticsSnapshot) {
    println!(
        "analytics for the last {} ({} to {})",
        snapshot.period, snapshot.start_date, snapshot.end_date
    );
    println!();

    let o = &snapshot.overview;
    println!("overview");
    println!("  views: {}  searches: {}", o.total_views, o.total_searches);
    println!(
        "  actions: {} website / {} phone / {} directions",
        o.website_clicks, o.phone_clicks, o.direction_requests
    );
    println!("  photo views: {}", o.photo_views);
    println!(
        "  posts: {}  answered questions: {}",
        o.post_count, o.answered_question_count
    );
    println!(
        "  reviews: {} (average rating {:.2})",
        o.review_count, o.average_rating
    );

    if !snapshot.locations.is_empty() {
        println!();
        println!(
            "{:<6}{:<26}{:<9}{:<11}{:<9}RATING",
            "ID", "LOCATION", "VIEWS", "SEARCHES", "REVIEWS"
        );
        for loc in &snapshot.locations {
            println!(
                "{:<6}{:<26}{:<9}{:<11}{:<9}{:.2}",
                loc.profile_id,
                clamp(&loc.name, 24),
                loc.views,
                loc.searches,
                loc.review_count,
                loc.average_rating
            );
        }
    }

    if !snapshot.top_posts.is_empty() {
        println!();
        println!("top posts");
        for post in &snapshot.top_posts {
            println!(
                "  [{}] {} ({} views, {} clicks)",
                post.score, post.content, post.views, post.clicks
            );
        }
    }

    if !snapshot.recent_reviews.is_empty() {
        println!();
        println!("recent reviews");
        for review in &snapshot.recent_reviews {
            let marker = if review.is_synthetic { " [sample]" } else { "" };
            println!(
                "  {}/5 {} \u{2014} {}{}",
                review.rating,
                review.author_name,
                review.comment.as_deref().unwrap_or("(no comment)"),
                marker
            );
        }
    }
}

/// Clamp a display string to `max` characters for fixed-width columns.
fn clamp(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        text.to_string()
    }
}
