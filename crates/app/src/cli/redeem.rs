use clap::{ArgGroup, Args};
use prodtrack_app::{
    context::AppContext,
    domain::coupons::{CouponsService, CouponsServiceError},
};

use super::source::{Captured, SOURCE_GROUP, SourceArgs};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new(SOURCE_GROUP).required(true)))]
pub(crate) struct RedeemArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Decoded payload text, when the code was read elsewhere
    #[arg(long, value_name = "TEXT", group = SOURCE_GROUP)]
    payload: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, args: RedeemArgs) -> Result<(), String> {
    let payload = match args.payload {
        Some(payload) => payload,
        None => match args.source.capture().await? {
            Captured::Payload(payload) => payload,
            Captured::NoCode(message) => {
                println!("{message}");
                return Ok(());
            }
        },
    };

    println!("{}", redeem_payload(ctx.coupons.as_ref(), &payload).await?);

    Ok(())
}

/// Redeem `payload` and describe the result.
pub(crate) async fn redeem_payload(
    coupons: &dyn CouponsService,
    payload: &str,
) -> Result<String, String> {
    match coupons.redeem(payload).await {
        Ok(redemption) => Ok(format!("Your Coupon Code: {}", redemption.coupon.code)),
        Err(CouponsServiceError::Unrecognized) => {
            Ok("This QR code was not generated by PRODTRACK app.".to_string())
        }
        Err(error) => Err(format!("failed to redeem coupon: {error}")),
    }
}
