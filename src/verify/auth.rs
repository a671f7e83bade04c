// Auth contract suite

use super::{login, Runner, SuiteReport, VerifyOptions};
use crate::api::{ApiClient, ApiError};

pub async fn run(api: &ApiClient, opts: &VerifyOptions) -> SuiteReport {
    let mut run = Runner::new("auth");

    if login(&mut run, api, opts).await {
        let profile = run.step("fetch profile", false, api.profile()).await;
        if let Some(user) = profile {
            run.check(
                "profile matches login email",
                user.email == opts.email,
                &format!("expected {}, got {}", opts.email, user.email),
            );
        } else {
            run.skip("profile matches login email");
        }

        run.check(
            "session token stored",
            api.is_authenticated(),
            "no token in the session store after login",
        );
    }

    run.expect_failure(
        "wrong password rejected with 401",
        api.login(&opts.email, "definitely-not-the-password"),
        |e| matches!(e, ApiError::Unauthorized(_)),
    )
    .await;

    // The wrong-password attempt must not have clobbered the good session.
    let _ = run
        .step("re-login restores session", true, api.login(&opts.email, &opts.password))
        .await;

    run.finish()
}
