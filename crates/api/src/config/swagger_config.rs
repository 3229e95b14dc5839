use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use packmule_primitives::error::ApiErrorResponse;
use packmule_primitives::models::dtos::announcement_dto::AvailabilityResponse;
use packmule_primitives::models::dtos::booking_dto::{
    Amounts, BookingLedgerResponse, BookingListResponse, BookingResponse, CancelBookingRequest,
    ConfirmDeliveryResponse, CreateBookingRequest, CreateBookingResponse,
    InitiatePaymentResponse, LedgerEntryDto, RefuseBookingRequest,
};
use packmule_primitives::models::dtos::settlement_dto::SweepReport;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::create_booking::create_booking,
        handlers::list_bookings::list_bookings,
        handlers::get_booking::get_booking,
        handlers::booking_ledger::booking_ledger,
        handlers::accept_booking::accept_booking,
        handlers::refuse_booking::refuse_booking,
        handlers::cancel_booking::cancel_booking,
        handlers::initiate_payment::initiate_payment,
        handlers::mark_in_transit::mark_in_transit,
        handlers::mark_delivered::mark_delivered,
        handlers::confirm_delivery::confirm_delivery,
        handlers::announcement_availability::announcement_availability,
        handlers::escrow_webhook::escrow_webhook,
        handlers::release_sweep::release_sweep,
    ),
    components(schemas(
        ApiErrorResponse,
        Amounts,
        CreateBookingRequest,
        CreateBookingResponse,
        RefuseBookingRequest,
        CancelBookingRequest,
        BookingResponse,
        BookingListResponse,
        BookingLedgerResponse,
        LedgerEntryDto,
        InitiatePaymentResponse,
        ConfirmDeliveryResponse,
        AvailabilityResponse,
        SweepReport,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Bookings", description = "Booking lifecycle"),
        (name = "Payments", description = "Escrow holds"),
        (name = "Settlement", description = "Fund release and audit"),
        (name = "Announcements", description = "Capacity ledger"),
        (name = "Webhooks", description = "Processor callbacks"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
