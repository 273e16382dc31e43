//! 酒店全流程测试 - 预订、入住、房账、退房
//!
//! 覆盖预订冲突检测、预订到入住的交接、房账挂账 (客房送餐
//! ROOM_ACCOUNT 结算) 以及强制退房。

use posada_engine::orders::ROOM_ACCOUNT_METHOD;
use posada_engine::{Config, Engine, EngineError, ErrorKind, EventPayload};
use rust_decimal::Decimal;
use shared::models::{
    BookingCreate, BookingStatus, BookingWindow, ChargeKind, OccupancyStatus, PrepArea, Product,
    ProductStatus, ResourceCreate, ResourceKind, ResourceStatus,
};
use shared::order::{LineInput, OrderDraft, OrderType, PaymentInput};

const HOUR: i64 = 3_600_000;

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn test_config() -> Config {
    let mut config = Config::with_overrides("/tmp/posada-it-hotel");
    config.default_tax_rate = dec("0.21");
    config.reservation_lead_minutes = 120;
    config
}

/// 引擎 + 两间客房 (80.00/晚) + 送餐商品
fn setup() -> (Engine, Vec<i64>) {
    let engine = Engine::initialize_in_memory(test_config()).unwrap();
    engine
        .catalog()
        .load(
            vec![
                Product {
                    id: 1,
                    category_id: None,
                    name: "Paella".to_string(),
                    price: dec("10.00"),
                    stock: 100,
                    prep_area: PrepArea::Kitchen,
                    status: ProductStatus::Active,
                },
                Product {
                    id: 2,
                    category_id: None,
                    name: "Sangria".to_string(),
                    price: dec("4.50"),
                    stock: 100,
                    prep_area: PrepArea::Bar,
                    status: ProductStatus::Active,
                },
            ],
            Vec::new(),
        )
        .unwrap();

    let mut rooms = Vec::new();
    for name in ["101", "102"] {
        let room = engine
            .locations()
            .register(ResourceCreate {
                kind: ResourceKind::Room,
                name: name.to_string(),
                capacity: 2,
                rate: Some(dec("80.00")),
            })
            .unwrap();
        rooms.push(room.id);
    }
    (engine, rooms)
}

fn booking(resource_id: i64, start_h: i64, end_h: i64) -> BookingCreate {
    BookingCreate {
        resource_id,
        customer_id: 7,
        party_size: 2,
        window: BookingWindow::new(start_h * HOUR, end_h * HOUR),
        note: None,
    }
}

#[test]
fn test_booking_conflict_window() {
    let (engine, rooms) = setup();

    // 19:00-21:00 占用后, 20:00-22:00 撞上, 21:00-22:00 紧贴可订
    let first = engine.bookings().create(booking(rooms[0], 19, 21)).unwrap();
    let err = engine
        .bookings()
        .create(booking(rooms[0], 20, 22))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::BookingOverlap { booking_id, .. } if booking_id == first.id
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert!(engine.bookings().create(booking(rooms[0], 21, 22)).is_ok());
    // 另一间房不受影响
    assert!(engine.bookings().create(booking(rooms[1], 19, 21)).is_ok());
}

#[test]
fn test_booked_guest_arrival_handoff() {
    let (engine, rooms) = setup();

    let reservation = engine.bookings().create(booking(rooms[0], 19, 21)).unwrap();
    engine
        .bookings()
        .update_status(reservation.id, BookingStatus::Confirmed)
        .unwrap();

    // 到店: 先开住单占房, 预订再标记到店
    let stay = engine
        .occupancy()
        .check_in(7, vec![rooms[0]], dec("80.00"), None)
        .unwrap();
    engine
        .bookings()
        .update_status(reservation.id, BookingStatus::CheckedIn)
        .unwrap();
    assert_eq!(
        engine.locations().get(rooms[0]).unwrap().status,
        ResourceStatus::Occupied
    );

    // 被占的房间开不了第二张住单
    let err = engine
        .occupancy()
        .check_in(8, vec![rooms[0]], Decimal::ZERO, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::RoomUnavailable { room_id } if room_id == rooms[0]));

    // 离店: 房账已清 (押金即房费), 住单关闭, 预订完成, 客房释放
    engine
        .occupancy()
        .add_charge(stay.id, ChargeKind::Room, "Night 1".to_string(), dec("80.00"))
        .unwrap();
    let closed = engine.occupancy().check_out(stay.id, false).unwrap();
    assert_eq!(closed.status, OccupancyStatus::CheckedOut);
    engine
        .bookings()
        .update_status(reservation.id, BookingStatus::Completed)
        .unwrap();
    assert_eq!(
        engine.locations().get(rooms[0]).unwrap().status,
        ResourceStatus::Available
    );
}

#[test]
fn test_folio_blocks_then_forced_check_out() {
    let (engine, rooms) = setup();
    let mut events = engine.subscribe();

    let stay = engine
        .occupancy()
        .check_in(7, vec![rooms[0]], Decimal::ZERO, None)
        .unwrap();
    engine
        .occupancy()
        .add_charge(stay.id, ChargeKind::Room, "Night 1".to_string(), dec("80.00"))
        .unwrap();

    // 欠款挡退房
    let err = engine.occupancy().check_out(stay.id, false).unwrap_err();
    assert!(matches!(
        err,
        EngineError::OutstandingBalance { balance, .. } if balance == dec("80.00")
    ));
    assert_eq!(err.kind(), ErrorKind::OutstandingBalance);
    assert!(engine.occupancy().find(stay.id).unwrap().is_active());

    // 强制退房: housekeeping 场景, 余额写死在事件里
    let closed = engine.occupancy().check_out(stay.id, true).unwrap();
    assert_eq!(closed.status, OccupancyStatus::CheckedOut);
    assert_eq!(
        engine.locations().get(rooms[0]).unwrap().status,
        ResourceStatus::Available
    );

    let mut forced_event = None;
    while let Ok(event) = events.try_recv() {
        if let EventPayload::OccupancyClosed { occupy_id, balance, forced } = event.payload {
            forced_event = Some((occupy_id, balance, forced));
        }
    }
    assert_eq!(forced_event, Some((stay.id, dec("80.00"), true)));
}

#[test]
fn test_room_service_settles_to_folio() {
    let (engine, rooms) = setup();

    let stay = engine
        .occupancy()
        .check_in(7, vec![rooms[0]], Decimal::ZERO, None)
        .unwrap();

    // 客房送餐: Paella + Sangria = 14.50, 21% IVA = 3.05
    let order = engine
        .orders()
        .open_order(OrderDraft {
            order_type: OrderType::RoomService,
            customer_id: Some(7),
            table_id: None,
            room_id: Some(rooms[0]),
            guest_count: 1,
            lines: vec![
                LineInput {
                    product_id: 1,
                    quantity: 1,
                    discount: None,
                    dispatch: None,
                    note: None,
                },
                LineInput {
                    product_id: 2,
                    quantity: 1,
                    discount: None,
                    dispatch: None,
                    note: None,
                },
            ],
            cart_discount: None,
            tax_rate: None,
            note: None,
        })
        .unwrap();
    assert_eq!(order.occupy_id, Some(stay.id));
    assert_eq!(order.total, dec("17.55"));

    engine
        .orders()
        .record_payment(
            order.id,
            PaymentInput {
                method: ROOM_ACCOUNT_METHOD.to_string(),
                amount: dec("17.55"),
                tendered: None,
                note: None,
            },
        )
        .unwrap();
    let sale = engine.orders().settle_order(order.id, false).unwrap();
    assert_eq!(sale.payment_summary[0].method, ROOM_ACCOUNT_METHOD);

    // 消费挂到房账
    let folio = engine.occupancy().find(stay.id).unwrap();
    assert_eq!(folio.charge_total_of(ChargeKind::Pos), dec("17.55"));
    let charge = folio
        .charges
        .iter()
        .find(|c| c.kind == ChargeKind::Pos)
        .unwrap();
    assert!(charge.description.contains(&order.order_no));
    assert_eq!(engine.occupancy().balance(stay.id).unwrap(), dec("17.55"));

    // 退房前清账
    engine
        .occupancy()
        .record_bill_payment(stay.id, "CARD".to_string(), dec("17.55"))
        .unwrap();
    let closed = engine.occupancy().check_out(stay.id, false).unwrap();
    assert_eq!(closed.status, OccupancyStatus::CheckedOut);
}

#[test]
fn test_room_service_requires_active_stay() {
    let (engine, rooms) = setup();

    let err = engine
        .orders()
        .open_order(OrderDraft {
            order_type: OrderType::RoomService,
            customer_id: None,
            table_id: None,
            room_id: Some(rooms[1]),
            guest_count: 1,
            lines: vec![LineInput {
                product_id: 1,
                quantity: 1,
                discount: None,
                dispatch: None,
                note: None,
            }],
            cart_discount: None,
            tax_rate: None,
            note: None,
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::NoActiveOccupancy { room_id } if room_id == rooms[1]));
    assert_eq!(err.kind(), ErrorKind::NotActive);
}
