use super::App;
use anyhow::Result;

pub fn show(app: &App) -> Result<()> {
    match app.session.current() {
        Some(session) => {
            let who = session
                .display_name()
                .unwrap_or_else(|| "unknown user".to_string());
            println!(
                "Signed in as {} since {}",
                who,
                session.signed_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("Not signed in"),
    }

    let services = &app.config.services;
    println!("Recommendation backend: {}", services.recommendation_url);
    println!("Auth backend:           {}", services.auth_url);
    Ok(())
}
