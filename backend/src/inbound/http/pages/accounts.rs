//! Login, signup, logout and profile pages.
//!
//! ```text
//! GET|POST /login/
//! GET|POST /signup/
//! GET|POST /logout
//! GET      /profile/{username}/
//! GET|POST /update-profile
//! ```

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::domain::{Bio, Error, LoginCredentials, NewAccount, User};
use crate::inbound::http::forms::{
    CsrfForm, FormErrors, LoginForm, NextQuery, ProfileForm, SignupForm, safe_next,
};
use crate::inbound::http::routes::paths;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::{LoginPage, ProfilePage, SignupPage, UpdateProfilePage};
use crate::inbound::http::validation::{
    bio_error, login_validation_error, signup_rejection_error,
};

use super::{PageContext, PageError, PageResult, login_redirect, profile_path, redirect, render};

fn render_login(
    page: &PageContext,
    username: String,
    next: Option<&str>,
    errors: FormErrors,
) -> Result<HttpResponse, Error> {
    render(&LoginPage {
        nav: page.nav.clone(),
        csrf_token: page.session.csrf_token()?,
        action: paths::LOGIN.to_owned(),
        username,
        next: safe_next(next).map(str::to_owned),
        errors,
    })
}

/// Render the login form.
pub async fn login_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let NextQuery { next } = query.into_inner();
    page.respond(render_login(
        &page,
        String::new(),
        next.as_deref(),
        FormErrors::default(),
    ))
}

/// Check credentials and start a session.
///
/// Success redirects to `next` when it is a local path, otherwise to the
/// user's profile. Failures re-render the form with the username kept.
pub async fn login_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let form = form.into_inner();
    page.check_csrf(form.csrf_token.as_deref())?;
    page.respond(attempt_login(&req, &state, &page, form).await)
}

async fn attempt_login(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
    form: LoginForm,
) -> Result<HttpResponse, Error> {
    let LoginForm {
        username,
        password,
        next,
        ..
    } = form;
    let outcome = match LoginCredentials::validate_all(&username, &password) {
        Ok(credentials) => state.login.authenticate(&credentials).await,
        Err(errors) => Err(login_validation_error(&errors)),
    };

    match outcome {
        Ok(user) => {
            page.session.sign_in(user.id())?;
            info!(username = %user.username(), "user signed in");
            let target = match safe_next(next.as_deref()) {
                Some(target) => target.to_owned(),
                None => profile_path(req, &user)?,
            };
            Ok(redirect(&target))
        }
        Err(error) => {
            let errors = FormErrors::from_error(error)?;
            render_login(page, username, next.as_deref(), errors)
        }
    }
}

fn render_signup(
    page: &PageContext,
    username: String,
    errors: FormErrors,
) -> Result<HttpResponse, Error> {
    render(&SignupPage {
        nav: page.nav.clone(),
        csrf_token: page.session.csrf_token()?,
        action: paths::SIGNUP.to_owned(),
        username,
        errors,
    })
}

/// Render the signup form.
pub async fn signup_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    page.respond(render_signup(&page, String::new(), FormErrors::default()))
}

/// Create an account, sign it in and show its profile.
pub async fn signup_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SignupForm>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let form = form.into_inner();
    page.check_csrf(form.csrf_token.as_deref())?;
    page.respond(attempt_signup(&req, &state, &page, form).await)
}

async fn attempt_signup(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
    form: SignupForm,
) -> Result<HttpResponse, Error> {
    let outcome = match NewAccount::try_from_parts(&form.username, &form.password1, &form.password2)
    {
        Ok(account) => state.signup.register(&account).await,
        Err(rejection) => Err(signup_rejection_error(&rejection)),
    };

    match outcome {
        Ok(user) => {
            page.session.sign_in(user.id())?;
            info!(username = %user.username(), "account created");
            Ok(redirect(&profile_path(req, &user)?))
        }
        Err(error) => {
            let errors = FormErrors::from_error(error)?;
            render_signup(page, form.username, errors)
        }
    }
}

/// `GET /logout`: end the session.
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect(paths::LOGIN)
}

/// `POST /logout`: end the session once the form's token checks out.
pub async fn logout_submit(session: SessionContext, form: web::Form<CsrfForm>) -> PageResult {
    session
        .verify_csrf(form.csrf_token.as_deref())
        .map_err(PageError::from)?;
    session.purge();
    Ok(redirect(paths::LOGIN))
}

/// Show a user's profile to a signed-in viewer.
pub async fn profile_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    username: web::Path<String>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let Some(viewer) = page.viewer.as_ref() else {
        return Ok(login_redirect(&req));
    };
    page.respond(render_profile(&state, &page, viewer, &username).await)
}

async fn render_profile(
    state: &HttpState,
    page: &PageContext,
    viewer: &User,
    username: &str,
) -> Result<HttpResponse, Error> {
    let user = state.profiles.profile(username).await?;
    render(&ProfilePage {
        nav: page.nav.clone(),
        csrf_token: page.session.csrf_token()?,
        username: user.username().to_string(),
        bio: user.bio().as_ref().to_owned(),
        is_owner: user.id() == viewer.id(),
        update_href: paths::UPDATE_PROFILE.to_owned(),
    })
}

fn render_update_profile(
    req: &HttpRequest,
    page: &PageContext,
    viewer: &User,
    bio: String,
    errors: FormErrors,
) -> Result<HttpResponse, Error> {
    render(&UpdateProfilePage {
        nav: page.nav.clone(),
        csrf_token: page.session.csrf_token()?,
        action: paths::UPDATE_PROFILE.to_owned(),
        bio,
        profile_href: profile_path(req, viewer)?,
        errors,
    })
}

/// Render the bio editor for the signed-in user.
pub async fn update_profile_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let Some(viewer) = page.viewer.as_ref() else {
        return Ok(login_redirect(&req));
    };
    let bio = viewer.bio().as_ref().to_owned();
    page.respond(render_update_profile(
        &req,
        &page,
        viewer,
        bio,
        FormErrors::default(),
    ))
}

/// Save the signed-in user's bio and return to their profile.
pub async fn update_profile_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ProfileForm>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let Some(viewer) = page.viewer.as_ref() else {
        return Ok(login_redirect(&req));
    };
    let form = form.into_inner();
    page.check_csrf(form.csrf_token.as_deref())?;
    page.respond(save_bio(&req, &state, &page, viewer, form.bio).await)
}

async fn save_bio(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
    viewer: &User,
    raw: String,
) -> Result<HttpResponse, Error> {
    let bio = match Bio::new(&raw) {
        Ok(bio) => bio,
        Err(error) => {
            let errors = FormErrors::from_error(bio_error(&error))?;
            return render_update_profile(req, page, viewer, raw, errors);
        }
    };
    let updated = state.profile_updates.update_bio(viewer.id(), bio).await?;
    info!(username = %updated.username(), "profile updated");
    Ok(redirect(&profile_path(req, &updated)?))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
