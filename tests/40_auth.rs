mod common;

use anyhow::Result;

use audit_library::auth::{RegisterRequest, SessionStore};
use audit_library::error::ClientError;

#[tokio::test]
async fn login_saves_session() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (auth, store) = server.auth();

    let err = auth.login(common::EMAIL, "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Invalid credentials"));
    assert!(store.load()?.is_none());

    let session = auth.login(common::EMAIL, common::PASSWORD).await?;
    assert_eq!(session.token, common::TOKEN);
    assert_eq!(session.expires_at, None);
    assert_eq!(store.load()?.map(|s| s.user.email), Some(common::EMAIL.to_string()));

    let user = auth.current_user().await?;
    assert_eq!(user.name, "Maria Santos");

    Ok(())
}

#[tokio::test]
async fn logout_clears_session() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (auth, store) = server.auth();

    auth.login(common::EMAIL, common::PASSWORD).await?;
    auth.logout().await?;
    assert!(store.load()?.is_none());
    assert!(!server.state.lock().unwrap().logged_in);

    let err = auth.current_user().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));

    // Nothing stored: logging out again is a no-op
    auth.logout().await?;

    Ok(())
}

#[tokio::test]
async fn rejected_session_is_forgotten() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (auth, store) = server.auth();

    auth.login(common::EMAIL, common::PASSWORD).await?;
    server.state.lock().unwrap().logged_in = false;

    let err = auth.current_user().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Unauthenticated."));
    assert!(store.load()?.is_none());

    auth.login(common::EMAIL, common::PASSWORD).await?;
    server.state.lock().unwrap().logged_in = false;
    auth.logout().await?;
    assert!(store.load()?.is_none());

    Ok(())
}

#[tokio::test]
async fn register_does_not_log_in() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (auth, store) = server.auth();

    let mut request = RegisterRequest {
        name: "Jose Reyes".into(),
        email: "jose@coa.gov.ph".into(),
        password: "secret123".into(),
        password_confirmation: "secret124".into(),
    };
    let err = auth.register(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "The password confirmation does not match.");

    request.password_confirmation = "secret123".into();
    let user = auth.register(&request).await?.expect("user echoed");
    assert_eq!(user.email, "jose@coa.gov.ph");
    assert!(store.load()?.is_none());

    Ok(())
}
