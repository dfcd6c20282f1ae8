use log::info;
use rust_decimal_macros::dec;
use std::sync::Arc;
use warden_core::{EngineRequest, SwapMode, TokenBalance};
use warden_runner::collaborators::{
    FixedSwapProvider, ScriptedAnalysisProvider, StaticBalanceProvider, TemplateReporter,
};
use warden_runner::{EngineBootstrap, RunnerConfig};

fn balance(asset: &str, amount: rust_decimal::Decimal, price: rust_decimal::Decimal) -> TokenBalance {
    TokenBalance {
        asset_id: asset.to_string(),
        ui_amount: amount,
        price_usd: Some(price),
        value_usd: None,
        symbol: Some(asset.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let balances = Arc::new(StaticBalanceProvider::new(vec![
        balance("USDC", dec!(500), dec!(1)),
        balance("SOL", dec!(10), dec!(150)),
    ]));

    let engine = EngineBootstrap::build(
        RunnerConfig::for_wallet("demo-wallet"),
        balances,
        Arc::new(ScriptedAnalysisProvider::default()),
        Arc::new(FixedSwapProvider::new()),
        Arc::new(TemplateReporter),
        None,
    )?;

    engine.start_monitor().await;
    info!("Monitoring {}", engine.wallet_id());

    let state = engine.handle(EngineRequest::Report).await;
    println!("{}\n", state.final_response.unwrap_or_default());

    let state = engine
        .handle(EngineRequest::Trade {
            input_asset: "SOL".to_string(),
            output_asset: "USDC".to_string(),
            amount: 2_000_000_000,
            mode: SwapMode::ExactIn,
            estimated_value: Some(dec!(300)),
        })
        .await;
    println!("{}\n", state.final_response.unwrap_or_default());

    for action in engine.pending_actions().await? {
        println!(
            "Pending: {} ({}) at {} - {}",
            action.id, action.kind, action.estimated_value, action.description
        );
    }

    engine.stop_monitor().await;
    Ok(())
}
