//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront::orders::{OrderStatus, PaymentStatus};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::models::CartUuid,
        orders::{
            MockOrdersService,
            models::{AddressInfo, Order, OrderItem, OrderUuid, PAYMENT_METHOD},
        },
        products::models::ProductUuid,
        users::UserUuid,
    },
};

use crate::{errors::json_catcher, state::State};

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        orders: Arc::new(orders),
    })
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .push(route),
    )
    .catcher(json_catcher())
}

/// A pending two-unit order for a single $50.00 product.
pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid) -> Order {
    Order {
        uuid,
        user_uuid: user,
        cart_uuid: CartUuid::new(),
        items: vec![OrderItem {
            product_uuid: ProductUuid::new(),
            title: "Blue Shirt".to_string(),
            image: Some("https://cdn.example.test/shirt.png".to_string()),
            price: 50_00,
            quantity: 2,
        }],
        address: AddressInfo {
            address: Some("1 High Street".to_string()),
            city: Some("Springfield".to_string()),
            ..AddressInfo::default()
        },
        order_status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_method: PAYMENT_METHOD.to_string(),
        payment_id: Some("pi_test".to_string()),
        payer_id: None,
        total_amount: 100_00,
        currency: "USD".to_string(),
        order_date: Timestamp::UNIX_EPOCH,
        order_update_date: Timestamp::UNIX_EPOCH,
    }
}

/// The same order after a successful capture.
pub(crate) fn make_confirmed_order(uuid: OrderUuid, user: UserUuid) -> Order {
    Order {
        order_status: OrderStatus::Confirmed,
        payment_status: PaymentStatus::Paid,
        ..make_order(uuid, user)
    }
}
