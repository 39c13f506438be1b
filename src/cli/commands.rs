//! Command handlers
//!
//! This module implements the main command handlers that coordinate between
//! CLI arguments and the core application functionality.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::export::{self, ExportDecision};
use crate::app::payment::{detect, BridgeGate, PaymentSession, SessionEvent};
use crate::app::search::{
    compile, effective_page, page_window, pager::total_pages, FilterSelection, PageRequest,
};
use crate::app::{ApiClient, PaymentApi, SearchApi, UserSession};
use crate::cli::{CheckoutArgs, ExportAction, ExportArgs, SearchArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result, SearchError};

/// Handle the search command
///
/// Compiles the filter selection, runs the query, and enforces the tier
/// page limit the way the web UI does: blocked pages print an upgrade
/// notice, out-of-range pages clamp and re-fetch.
pub async fn handle_search(args: SearchArgs, config: &AppConfig) -> Result<()> {
    if args.keyword.trim().is_empty() {
        return Err(SearchError::EmptyKeyword.into());
    }
    args.validate().map_err(AppError::generic)?;

    let client = ApiClient::with_config(config.client_config())?;
    let session = resolve_session(&client).await;
    let tier = session.tier();
    debug!(?tier, "resolved access tier");

    let selection = build_selection(&args);
    let page_size = args.page_size.unwrap_or(config.search.page_size);

    let request = compile(
        &selection,
        &args.keyword,
        PageRequest {
            page: args.page,
            page_size,
        },
    );
    let mut response = client.search_multi(&request).await?;
    let total = response.total_hits();

    let decision = effective_page(args.page, total, page_size, tier);
    if decision.blocked {
        println!("共 {} 条结果", total);
        match decision.reason {
            Some(crate::app::search::BlockReason::UpgradeRequired) => {
                println!("该页需要登录后查看，开通会员可浏览更多结果。");
            }
            _ => {
                println!(
                    "当前等级最多可浏览 {} 页，开通会员解锁更多页。",
                    tier.max_page_limit()
                );
            }
        }
        return Ok(());
    }

    if decision.page != args.page {
        info!(
            requested = args.page,
            effective = decision.page,
            "requested page out of range; re-fetching"
        );
        let request = compile(
            &selection,
            &args.keyword,
            PageRequest {
                page: decision.page,
                page_size,
            },
        );
        response = client.search_multi(&request).await?;
    }

    let effective_total = total_pages(total, page_size).min(tier.max_page_limit());
    let window = page_window(decision.page, effective_total, config.search.max_pages_to_show);

    println!("共 {} 条结果", total);
    println!(
        "第 {} / {} 页（页码 {}-{}）",
        decision.page, effective_total, window.start, window.end
    );
    for hit in &response.hits.hits {
        println!("{}", serde_json::to_string(hit).unwrap_or_default());
    }

    Ok(())
}

/// Handle the export command
pub async fn handle_export(args: ExportArgs, config: &AppConfig) -> Result<()> {
    let client = ApiClient::with_config(config.client_config())?;

    match args.action {
        ExportAction::Quota => {
            let decision = export::check(&client).await?;
            print_export_decision(&decision);
        }
        ExportAction::Submit {
            keyword,
            province,
            industries,
        } => {
            let mut selection = FilterSelection::new();
            if let Some(province) = province {
                selection.select_province(province);
            }
            for industry in industries {
                selection.toggle_industry(industry);
            }
            let request = compile(&selection, &keyword, PageRequest::default());

            let decision = export::submit(&client, &request.keyword, &request.field_filters).await?;
            print_export_decision(&decision);
            if matches!(decision, ExportDecision::Proceed { .. }) {
                println!("导出任务已提交。");
            }
        }
    }

    Ok(())
}

fn print_export_decision(decision: &ExportDecision) {
    match decision {
        ExportDecision::Proceed {
            remaining,
            batch_ceiling,
        } => {
            println!(
                "今日剩余导出额度 {} 条（单次最多 {} 条）。",
                remaining, batch_ceiling
            );
        }
        ExportDecision::RequireUpgrade => {
            println!("当前账户无导出权限，开通会员后可导出。");
        }
        ExportDecision::QuotaExhausted => {
            println!("今日导出额度已用完，请明天再试。");
        }
    }
}

/// Handle the checkout command
///
/// Runs one payment session to completion: opens the order, prints the
/// channel presentation, and relays status changes until the session
/// settles, times out, or the user interrupts with Ctrl-C.
pub async fn handle_checkout(args: CheckoutArgs, config: &AppConfig) -> Result<()> {
    let client: Arc<dyn PaymentApi> = Arc::new(ApiClient::with_config(config.client_config())?);

    let user_agent = args
        .user_agent
        .as_deref()
        .unwrap_or("Mozilla/5.0 (X11; Linux x86_64)");
    let environment = detect(user_agent);
    info!(?environment, channel = %args.channel, "starting checkout");

    // no deferred bridge injection in a terminal host
    let gate = BridgeGate::ready();

    let (session, mut events) = PaymentSession::new(
        client,
        args.plan_id,
        args.channel,
        environment,
        config.payment_config(),
        gate,
    );

    if let Err(e) = session.open().await {
        println!("支付失败：{}", e);
        return Err(AppError::Payment(e));
    }

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else { break };
                match event {
                    SessionEvent::ShowQrCode(payload) => {
                        println!("请扫码支付：{}", payload);
                    }
                    SessionEvent::Redirect(url) => {
                        println!("请在浏览器中完成支付：{}", url);
                        // navigation hands completion off to the gateway
                        break;
                    }
                    SessionEvent::InvokeBridge(request) => {
                        println!("调起支付（订单包 {}）", request.package);
                    }
                    SessionEvent::StatusChanged(status) => {
                        println!("订单状态：{}", status.label());
                    }
                    SessionEvent::Succeeded => {
                        println!("支付成功，会员权益已生效。");
                    }
                    SessionEvent::TimedOut => {
                        println!("等待支付超时，订单仍可能在稍后完成。");
                        session.close();
                        break;
                    }
                    SessionEvent::Closed => {
                        session.close();
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("checkout interrupted");
                session.close();
                break;
            }
        }
    }

    Ok(())
}

/// Resolve membership against the backend, degrading to guest on failure
async fn resolve_session(client: &ApiClient) -> UserSession {
    let mut session = UserSession::anonymous();
    if let Err(e) = session.resolve(client).await {
        debug!(error = %e, "membership lookup failed; treating as guest");
        session.reset();
    }
    session
}

/// Build a filter selection from search arguments
fn build_selection(args: &SearchArgs) -> FilterSelection {
    let mut selection = FilterSelection::new();
    for scope in &args.scopes {
        selection.toggle_scope(scope.clone());
    }
    if let Some(province) = &args.province {
        selection.select_province(province.clone());
    }
    for city in &args.cities {
        selection.toggle_city(city.clone());
    }
    for industry in &args.industries {
        selection.toggle_industry(industry.clone());
    }
    for range in &args.year_ranges {
        selection.toggle_year_range(range.clone());
    }
    for channel in &args.contact_channels {
        selection.toggle_contact_channel(channel.clone());
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_selection_wires_all_filter_kinds() {
        let args = SearchArgs {
            keyword: "科技".to_string(),
            scopes: vec!["企业名称".to_string()],
            province: Some("广东省".to_string()),
            cities: vec!["深圳市".to_string()],
            industries: vec!["制造业".to_string()],
            year_ranges: vec!["1-3年".to_string()],
            contact_channels: vec!["电话".to_string()],
            page: 1,
            page_size: None,
        };

        let selection = build_selection(&args);
        assert!(selection.scopes.contains("企业名称"));
        assert_eq!(selection.province.as_deref(), Some("广东省"));
        assert!(selection.cities().contains("深圳市"));
        assert!(selection.industries.contains("制造业"));
        assert!(selection.year_ranges.contains("1-3年"));
        assert!(selection.contact_channels.contains("电话"));
    }
}
