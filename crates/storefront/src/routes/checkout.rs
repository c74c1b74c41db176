//! Checkout route handlers: address -> payment -> summary -> confirmed.
//!
//! Each page reads and merges its slice into the session-held draft; the
//! guarded transitions live in [`crate::checkout::machine`]. Submission
//! failures keep the user on the summary page with the backend's message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use mangaba_core::{Cep, Money};

use crate::backend::types::OrderRequest;
use crate::cart::{CartService, SessionCartStore};
use crate::checkout::{
    Address, CardDetails, CardErrors, CheckoutState, OrderDraft, Payment, payment,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, session_keys};
use crate::services::CepLookupError;
use crate::state::AppState;

/// Standard delivery rate in centavos, used when no quote is available.
const STANDARD_SHIPPING_CENTS: i64 = 15_90;

fn standard_shipping() -> Money {
    Money::from_cents(STANDARD_SHIPPING_CENTS)
}

// =============================================================================
// Draft session helpers
// =============================================================================

/// Load the draft from the session, defaulting to empty.
async fn load_draft(session: &Session) -> Result<OrderDraft> {
    Ok(session
        .get::<OrderDraft>(session_keys::ORDER_DRAFT)
        .await?
        .unwrap_or_default())
}

/// Persist the draft to the session.
async fn save_draft(session: &Session, draft: &OrderDraft) -> Result<()> {
    session.insert(session_keys::ORDER_DRAFT, draft).await?;
    Ok(())
}

/// Discard the draft (after submission).
async fn clear_draft(session: &Session) -> Result<()> {
    session
        .remove::<OrderDraft>(session_keys::ORDER_DRAFT)
        .await?;
    Ok(())
}

// =============================================================================
// Entry
// =============================================================================

/// Enter the checkout flow: copy the cart's lines into the draft and move
/// to the address step. Re-entry keeps previously entered slices.
#[instrument(skip(session))]
pub async fn start(session: Session) -> Result<Response> {
    let service = CartService::new(SessionCartStore::new(&session));
    let items = service.items().await?;

    if items.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let draft = load_draft(&session).await?.with_items(items);
    save_draft(&session, &draft).await?;

    Ok(Redirect::to("/checkout/address").into_response())
}

// =============================================================================
// Address step
// =============================================================================

/// Address form fields as posted (and echoed back).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl AddressForm {
    fn from_address(address: &Address) -> Self {
        Self {
            cep: address.cep.formatted(),
            street: address.street.clone(),
            number: address.number.clone(),
            complement: address.complement.clone().unwrap_or_default(),
            neighborhood: address.neighborhood.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
        }
    }
}

/// Per-field errors for the address form.
#[derive(Debug, Clone, Default)]
pub struct AddressErrors {
    pub cep: Option<&'static str>,
    pub street: Option<&'static str>,
    pub number: Option<&'static str>,
    pub neighborhood: Option<&'static str>,
    pub city: Option<&'static str>,
    pub state: Option<&'static str>,
}

impl AddressErrors {
    fn is_empty(&self) -> bool {
        self.cep.is_none()
            && self.street.is_none()
            && self.number.is_none()
            && self.neighborhood.is_none()
            && self.city.is_none()
            && self.state.is_none()
    }
}

/// Validate the address form, returning the parsed CEP alongside any
/// field errors.
fn validate_address(form: &AddressForm) -> (Option<Cep>, AddressErrors) {
    let mut errors = AddressErrors::default();

    let cep = match Cep::parse(&form.cep) {
        Ok(cep) => Some(cep),
        Err(_) => {
            errors.cep = Some("Enter a valid 8-digit CEP");
            None
        }
    };
    if form.street.trim().is_empty() {
        errors.street = Some("Street is required");
    }
    if form.number.trim().is_empty() {
        errors.number = Some("Number is required");
    }
    if form.neighborhood.trim().is_empty() {
        errors.neighborhood = Some("Neighborhood is required");
    }
    if form.city.trim().is_empty() {
        errors.city = Some("City is required");
    }
    if form.state.trim().is_empty() {
        errors.state = Some("State is required");
    }

    (cep, errors)
}

/// Address step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/address.html")]
pub struct AddressTemplate {
    pub form: AddressForm,
    pub errors: AddressErrors,
    pub user: Option<CurrentUser>,
}

/// Address fields fragment (CEP lookup target).
#[derive(Template, WebTemplate)]
#[template(path = "partials/address_fields.html")]
pub struct AddressFieldsTemplate {
    pub form: AddressForm,
    pub errors: AddressErrors,
}

/// Display the address step, pre-filled from the draft.
#[instrument(skip(session, user))]
pub async fn address_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let draft = load_draft(&session).await?;
    let form = draft
        .address
        .as_ref()
        .map(AddressForm::from_address)
        .unwrap_or_default();

    Ok(AddressTemplate {
        form,
        errors: AddressErrors::default(),
        user,
    })
}

/// Look up a CEP and return the address fields fragment (HTMX).
///
/// A lookup miss and a lookup failure read the same to the user: the code
/// was not found. Manually entered fields are preserved.
#[instrument(skip(state))]
pub async fn lookup_cep(
    State(state): State<AppState>,
    Form(mut form): Form<AddressForm>,
) -> impl IntoResponse {
    let mut errors = AddressErrors::default();

    match Cep::parse(&form.cep) {
        Err(_) => errors.cep = Some("Enter a valid 8-digit CEP"),
        Ok(cep) => match state.postal().lookup(&cep).await {
            Ok(found) => {
                form.cep = cep.formatted();
                form.street = found.street;
                form.neighborhood = found.neighborhood;
                form.city = found.city;
                form.state = found.state;
            }
            Err(CepLookupError::NotFound) => {
                errors.cep = Some("CEP not found");
            }
        },
    }

    AddressFieldsTemplate { form, errors }
}

/// Submit the address step.
///
/// On success the shipping quote is fetched for the address's CEP; a quote
/// failure falls back to the standard rate rather than blocking checkout.
#[instrument(skip(state, session, user))]
pub async fn submit_address(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let (cep, errors) = validate_address(&form);

    let Some(cep) = cep else {
        return Ok(AddressTemplate { form, errors, user }.into_response());
    };
    if !errors.is_empty() {
        return Ok(AddressTemplate { form, errors, user }.into_response());
    }

    let complement = form.complement.trim();
    let address = Address {
        street: form.street.trim().to_string(),
        number: form.number.trim().to_string(),
        complement: (!complement.is_empty()).then(|| complement.to_string()),
        neighborhood: form.neighborhood.trim().to_string(),
        city: form.city.trim().to_string(),
        state: form.state.trim().to_string(),
        cep: cep.clone(),
    };

    let shipping = match state.backend().shipping_quote(&cep).await {
        Ok(quote) => quote.price,
        Err(e) => {
            tracing::warn!("Shipping quote failed, using standard rate: {e}");
            standard_shipping()
        }
    };

    let draft = load_draft(&session)
        .await?
        .with_address(address)
        .with_shipping(shipping);
    save_draft(&session, &draft).await?;

    Ok(Redirect::to("/checkout/payment").into_response())
}

// =============================================================================
// Payment step
// =============================================================================

/// Payment form fields as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub holder: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
}

/// Payment step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub method: String,
    pub card: PaymentForm,
    pub errors: CardErrors,
    pub error: Option<String>,
    pub user: Option<CurrentUser>,
}

/// Display the payment step, pre-filled from the draft.
#[instrument(skip(session, user))]
pub async fn payment_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let draft = load_draft(&session).await?;

    let (method, card) = match &draft.payment {
        Some(Payment::Card(details)) => (
            "card".to_string(),
            PaymentForm {
                method: "card".to_string(),
                number: details.number.clone(),
                holder: details.holder.clone(),
                expiry: details.expiry.clone(),
                cvv: details.cvv.clone(),
            },
        ),
        Some(Payment::Boleto) => ("boleto".to_string(), PaymentForm::default()),
        None => (String::new(), PaymentForm::default()),
    };

    Ok(PaymentTemplate {
        method,
        card,
        errors: CardErrors::default(),
        error: None,
        user,
    })
}

/// Submit the payment step.
///
/// The form carries card data, so it stays out of the span.
#[instrument(skip(session, user, form))]
pub async fn submit_payment(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let draft = load_draft(&session).await?;

    let selected = match form.method.as_str() {
        "boleto" => Payment::Boleto,
        "card" => {
            let card = CardDetails {
                number: payment::mask_card_number(&form.number),
                holder: form.holder.trim().to_string(),
                expiry: payment::mask_expiry(&form.expiry),
                cvv: payment::mask_cvv(&form.cvv),
            };
            let errors = card.validate();
            if !errors.is_empty() {
                return Ok(PaymentTemplate {
                    method: "card".to_string(),
                    card: form,
                    errors,
                    error: None,
                    user,
                }
                .into_response());
            }
            Payment::Card(card)
        }
        _ => {
            return Ok(PaymentTemplate {
                method: String::new(),
                card: form,
                errors: CardErrors::default(),
                error: Some("Select a payment method".to_string()),
                user,
            }
            .into_response());
        }
    };

    let draft = draft.with_payment(selected);

    match CheckoutState::Payment.advance(&draft) {
        Ok(_) => {
            save_draft(&session, &draft).await?;
            Ok(Redirect::to("/checkout/summary").into_response())
        }
        Err(e) => Ok(PaymentTemplate {
            method: form.method.clone(),
            card: form,
            errors: CardErrors::default(),
            error: Some(e.to_string()),
            user,
        }
        .into_response()),
    }
}

// =============================================================================
// Summary & submission
// =============================================================================

/// Summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/summary.html")]
pub struct SummaryTemplate {
    pub draft: OrderDraft,
    pub subtotal: Money,
    pub shipping: Option<Money>,
    pub total: Option<Money>,
    pub can_confirm: bool,
    pub error: Option<String>,
    pub user: Option<CurrentUser>,
}

impl SummaryTemplate {
    fn build(draft: OrderDraft, error: Option<String>, user: Option<CurrentUser>) -> Self {
        let subtotal = draft.subtotal();
        let shipping = draft.shipping;
        let total = draft.total();
        let can_confirm = CheckoutState::Summary.advance(&draft).is_ok();
        Self {
            draft,
            subtotal,
            shipping,
            total,
            can_confirm,
            error,
            user,
        }
    }
}

/// Display the order summary.
#[instrument(skip(session, user))]
pub async fn summary_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let draft = load_draft(&session).await?;

    if draft.items.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(SummaryTemplate::build(draft, None, user).into_response())
}

/// Submit the order to the backend.
///
/// Success clears the draft and the cart and moves to the confirmation
/// page; failure re-renders the summary with the backend's message.
#[instrument(skip(state, session, user))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let draft = load_draft(&session).await?;

    if let Err(e) = CheckoutState::Summary.advance(&draft) {
        return Ok(SummaryTemplate::build(draft, Some(e.to_string()), user).into_response());
    }

    // The guard above ensures both slices are present.
    let (Some(address), Some(payment)) = (draft.address.clone(), draft.payment.clone()) else {
        return Ok(SummaryTemplate::build(
            draft,
            Some("The order is incomplete".to_string()),
            user,
        )
        .into_response());
    };

    let order = OrderRequest {
        items: draft.items.clone(),
        address,
        payment,
        shipping: draft.shipping.unwrap_or_else(standard_shipping),
    };

    match state.backend().submit_order(&order).await {
        Ok(confirmation) => {
            clear_draft(&session).await?;
            CartService::new(SessionCartStore::new(&session))
                .clear()
                .await?;
            Ok(Redirect::to(&format!("/checkout/confirmed?order={}", confirmation.id))
                .into_response())
        }
        Err(e) => {
            tracing::error!("Order submission failed: {e}");
            Ok(SummaryTemplate::build(draft, Some(e.user_message()), user).into_response())
        }
    }
}

/// Confirmation page query.
#[derive(Debug, Deserialize)]
pub struct ConfirmedQuery {
    pub order: Option<i64>,
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmed.html")]
pub struct ConfirmedTemplate {
    pub order: Option<i64>,
    pub user: Option<CurrentUser>,
}

/// Display the order confirmation page.
#[instrument(skip(user))]
pub async fn confirmed(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ConfirmedQuery>,
) -> impl IntoResponse {
    ConfirmedTemplate {
        order: query.order,
        user,
    }
}
