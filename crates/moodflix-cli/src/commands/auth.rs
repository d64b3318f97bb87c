use super::App;
use anyhow::Result;
use moodflix_application::AuthUseCase;
use moodflix_core::auth::SignupForm;
use moodflix_interaction::AuthApiClient;
use std::sync::Arc;

fn use_case(app: &App) -> AuthUseCase {
    let client = AuthApiClient::from_endpoints(&app.config.services);
    AuthUseCase::new(Arc::new(client), app.session.clone())
}

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let session = use_case(app).login(email, password).await?;
    println!("Signed in as {}", session.display_name().as_deref().unwrap_or(email));
    Ok(())
}

pub async fn signup(
    app: &App,
    firstname: String,
    lastname: String,
    email: String,
    password: String,
) -> Result<()> {
    let form = SignupForm {
        firstname,
        lastname,
        email,
        password,
    };
    let session = use_case(app).signup(form).await?;
    println!(
        "Account created. Signed in as {}",
        session.display_name().as_deref().unwrap_or("new user")
    );
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    if !app.session.is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }
    use_case(app).logout().await;
    println!("Signed out");
    Ok(())
}
