//! Test Helpers

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            models::{CartUuid, NewCart},
        },
        products::models::{NewProduct, ProductUuid},
        users::UserUuid,
    },
    test::TestContext,
};

pub(crate) fn new_product(uuid: ProductUuid, price: u64, total_stock: u64) -> NewProduct {
    NewProduct {
        uuid,
        title: "Product".to_string(),
        image: None,
        price,
        sale_price: 0,
        total_stock,
    }
}

/// Create a cart for `user` holding the given product quantities.
pub(crate) async fn seed_cart(
    ctx: &TestContext,
    user: UserUuid,
    items: &[(ProductUuid, u32)],
) -> Result<CartUuid, CartsServiceError> {
    let cart = CartUuid::new();

    ctx.carts
        .create_cart(NewCart {
            uuid: cart,
            user_uuid: Some(user),
        })
        .await?;

    for &(product, quantity) in items {
        ctx.carts.set_item(cart, product, quantity).await?;
    }

    Ok(cart)
}
