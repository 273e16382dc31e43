//! 堂食全流程测试 - 开台到结账
//!
//! 使用 Engine::initialize_in_memory 完整装配引擎，覆盖：
//! 开台 → 厨打派发 → 分单支付 → 结算 → 释放桌台

use posada_engine::{Config, Engine, EngineError, ErrorKind, EventPayload};
use rust_decimal::Decimal;
use shared::models::{
    PrepArea, Product, ProductStatus, ResourceCreate, ResourceKind, ResourceStatus, TicketKind,
    TicketStatus,
};
use shared::order::{Discount, LineInput, OrderDraft, OrderStatus, OrderType, PaymentInput};

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn test_config() -> Config {
    let mut config = Config::with_overrides("/tmp/posada-it-dine-in");
    config.default_tax_rate = dec("0.21");
    config.reservation_lead_minutes = 120;
    config
}

fn product(id: i64, name: &str, price: &str, prep_area: PrepArea) -> Product {
    Product {
        id,
        category_id: None,
        name: name.to_string(),
        price: dec(price),
        stock: 100,
        prep_area,
        status: ProductStatus::Active,
    }
}

/// 引擎 + 商品目录 + 一张桌台
fn setup() -> (Engine, i64) {
    let engine = Engine::initialize_in_memory(test_config()).unwrap();
    engine
        .catalog()
        .load(
            vec![
                product(1, "Paella", "10.00", PrepArea::Kitchen),
                product(2, "Sangria", "4.50", PrepArea::Bar),
                product(3, "Flan", "3.00", PrepArea::None),
            ],
            Vec::new(),
        )
        .unwrap();
    let table = engine
        .locations()
        .register(ResourceCreate {
            kind: ResourceKind::Table,
            name: "T1".to_string(),
            capacity: 4,
            rate: None,
        })
        .unwrap();
    (engine, table.id)
}

fn line(product_id: i64, quantity: i32) -> LineInput {
    LineInput {
        product_id,
        quantity,
        discount: None,
        dispatch: None,
        note: None,
    }
}

fn dine_in_draft(table_id: i64, lines: Vec<LineInput>) -> OrderDraft {
    OrderDraft {
        order_type: OrderType::DineIn,
        customer_id: None,
        table_id: Some(table_id),
        room_id: None,
        guest_count: 2,
        lines,
        cart_discount: None,
        tax_rate: None,
        note: None,
    }
}

fn payment(method: &str, amount: &str, tendered: Option<&str>) -> PaymentInput {
    PaymentInput {
        method: method.to_string(),
        amount: dec(amount),
        tendered: tendered.map(dec),
        note: None,
    }
}

#[test]
fn test_full_dine_in_flow() {
    let (engine, table_id) = setup();
    let mut events = engine.subscribe();

    // 1. 开台: 2x Paella + 2x Sangria + 1x Flan
    let order = engine
        .orders()
        .open_order(dine_in_draft(
            table_id,
            vec![line(1, 2), line(2, 2), line(3, 1)],
        ))
        .unwrap();

    assert!(order.order_no.starts_with("PED"));
    assert_eq!(order.subtotal, dec("32.00"));
    assert_eq!(order.tax, dec("6.72")); // 21% IVA on 32.00
    assert_eq!(order.total, dec("38.72"));
    assert_eq!(
        engine.locations().get(table_id).unwrap().status,
        ResourceStatus::Occupied
    );

    // 2. 派发: Paella 进厨房, Sangria 进吧台, Flan 不打票
    let tickets = engine.orders().dispatch_tickets(order.id).unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].kind, TicketKind::Kot);
    assert_eq!(tickets[0].ticket_no, "KOT-0001");
    assert_eq!(tickets[0].items[0].name, "Paella");
    assert_eq!(tickets[1].kind, TicketKind::Bot);
    assert_eq!(tickets[1].ticket_no, "BOT-0001");

    // 重复派发不产生新票
    assert!(engine.orders().dispatch_tickets(order.id).unwrap().is_empty());

    // 3. 厨房推进工单
    engine
        .tickets()
        .update_status(tickets[0].id, TicketStatus::Preparing)
        .unwrap();
    engine
        .tickets()
        .update_status(tickets[0].id, TicketStatus::Ready)
        .unwrap();
    assert_eq!(engine.tickets().list_open().unwrap().len(), 1); // BOT still out

    // 4. 分单支付: 卡 20.00, 现金 18.72 (递 20.00, 找零 1.28)
    engine
        .orders()
        .record_payment(order.id, payment("CARD", "20.00", None))
        .unwrap();
    let paid = engine
        .orders()
        .record_payment(order.id, payment("CASH", "18.72", Some("20.00")))
        .unwrap();
    assert_eq!(paid.paid_total(), dec("38.72"));
    assert_eq!(paid.change_total(), dec("1.28"));

    // 5. 结算
    let sale = engine.orders().settle_order(order.id, false).unwrap();
    assert!(sale.receipt_number.starts_with("FAC"));
    assert_eq!(sale.total, dec("38.72"));
    assert_eq!(sale.paid_total, dec("38.72"));
    assert_eq!(sale.change_total, dec("1.28"));
    assert_eq!(sale.credit, Decimal::ZERO);
    assert_eq!(sale.payment_summary.len(), 2);
    assert_eq!(sale.table_name.as_deref(), Some("T1"));

    // 桌台释放, 订单归档
    assert_eq!(
        engine.locations().get(table_id).unwrap().status,
        ResourceStatus::Available
    );
    let settled = engine.orders().get_order(order.id).unwrap();
    assert_eq!(settled.status, OrderStatus::Settled);
    assert!(settled.settled_at.is_some());
    assert!(engine.orders().list_active().unwrap().is_empty());

    // 销售单可按回执号查回
    let found = engine
        .orders()
        .find_sale_by_receipt(&sale.receipt_number)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, sale.id);

    // 事件流里能看到开台与结算
    let mut seen_opened = false;
    let mut seen_settled = false;
    while let Ok(event) = events.try_recv() {
        match event.payload {
            EventPayload::OrderOpened { order_id, .. } if order_id == order.id => {
                seen_opened = true;
            }
            EventPayload::OrderSettled { order_id, .. } if order_id == order.id => {
                seen_settled = true;
            }
            _ => {}
        }
    }
    assert!(seen_opened);
    assert!(seen_settled);
}

#[test]
fn test_hold_resume_and_cancel_cascade() {
    let (engine, table_id) = setup();

    let order = engine
        .orders()
        .open_order(dine_in_draft(table_id, vec![line(1, 1), line(2, 1)]))
        .unwrap();
    let tickets = engine.orders().dispatch_tickets(order.id).unwrap();
    assert_eq!(tickets.len(), 2);

    // 挂单后不能收款
    engine.orders().hold_order(order.id).unwrap();
    let err = engine
        .orders()
        .record_payment(order.id, payment("CASH", "5.00", None))
        .unwrap_err();
    assert!(matches!(err, EngineError::OrderState { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    // 挂单仍占桌, 仍在活动列表
    assert_eq!(
        engine.locations().get(table_id).unwrap().status,
        ResourceStatus::Occupied
    );
    assert_eq!(engine.orders().list_active().unwrap().len(), 1);

    engine.orders().resume_order(order.id).unwrap();

    // 取消: 桌台释放, 未完成工单同步取消
    engine.orders().cancel_order(order.id).unwrap();
    assert_eq!(
        engine.locations().get(table_id).unwrap().status,
        ResourceStatus::Available
    );
    for ticket in engine.tickets().list_for_order(order.id).unwrap() {
        assert_eq!(ticket.status, TicketStatus::Cancelled);
    }
    assert_eq!(
        engine.orders().get_order(order.id).unwrap().status,
        OrderStatus::Cancelled
    );
}

#[test]
fn test_cart_discount_worked_example() {
    let (engine, table_id) = setup();

    // 2x Paella = 20.00, 整单九折, 税率改为 13%
    let mut draft = dine_in_draft(table_id, vec![line(1, 2)]);
    draft.tax_rate = Some(dec("0.13"));
    draft.cart_discount = Some(Discount::percentage(dec("10")));
    let order = engine.orders().open_order(draft).unwrap();

    assert_eq!(order.subtotal, dec("20.00"));
    assert_eq!(order.discount_total, dec("2.00"));
    assert_eq!(order.tax, dec("2.34")); // 13% on 18.00
    assert_eq!(order.total, dec("20.34"));

    // 税前基数随折扣变化: 去掉折扣后重算
    let updated = engine.orders().set_cart_discount(order.id, None).unwrap();
    assert_eq!(updated.discount_total, Decimal::ZERO);
    assert_eq!(updated.tax, dec("2.60"));
    assert_eq!(updated.total, dec("22.60"));
}

#[test]
fn test_refund_after_settle_keeps_sale_immutable() {
    let (engine, table_id) = setup();

    let order = engine
        .orders()
        .open_order(dine_in_draft(table_id, vec![line(1, 1)]))
        .unwrap();
    engine
        .orders()
        .record_payment(order.id, payment("CARD", "12.10", None))
        .unwrap();
    let sale = engine.orders().settle_order(order.id, false).unwrap();

    // 事后退款: 支付记录翻转, 订单保持已结算, 销售单原封不动
    let refunded = engine
        .orders()
        .refund_payment(order.id, 1, Some("complaint".to_string()))
        .unwrap();
    assert_eq!(refunded.status, OrderStatus::Settled);
    assert!(!refunded.payments[0].is_active());
    assert_eq!(refunded.payments[0].refund_reason.as_deref(), Some("complaint"));

    let sale_after = engine.orders().get_sale(sale.id).unwrap();
    assert_eq!(sale_after, sale);

    // 对已结算订单 reconcile 只读不动
    let rec = engine.orders().reconcile(order.id).unwrap();
    assert_eq!(rec.dues, dec("12.10"));
    assert!(!rec.settled);
    assert_eq!(
        engine.orders().get_order(order.id).unwrap().status,
        OrderStatus::Settled
    );
}

#[test]
fn test_second_order_on_occupied_table_rejected() {
    let (engine, table_id) = setup();

    engine
        .orders()
        .open_order(dine_in_draft(table_id, vec![line(1, 1)]))
        .unwrap();
    let err = engine
        .orders()
        .open_order(dine_in_draft(table_id, vec![line(2, 1)]))
        .unwrap_err();
    assert!(matches!(err, EngineError::TableUnavailable { table_id: t } if t == table_id));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
