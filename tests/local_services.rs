// tests/local_services.rs

mod common;

use std::{path::PathBuf, sync::Arc, time::Duration};

use rust_decimal::Decimal;

use common::{draft, memory_storage, open_store};
use escola_musica::{
    common::error::AppError,
    config::AppConfig,
    models::{
        auth::{LoginRequest, UserRole},
        payment::CreatePaymentRequest,
        student::{
            CreateStudentRequest, ExperienceLevel, Instrument, PackageType, PaymentStatus,
            UpdateStudentRequest,
        },
    },
    services::{
        dashboard_service::DashboardService, session::AuthSession, ServiceFactory, ServiceMode,
        Services,
    },
    storage::{DurableStorage, SESSION_KEY},
};

fn local_services() -> (Services, Arc<dyn DurableStorage>) {
    let storage = memory_storage();
    let store = open_store(&storage, 0);
    store.add_student(draft("Ana Silva", "ana.silva@email.com", PackageType::Individual));
    store.add_student(draft("Bruno Costa", "bruno.costa@email.com", PackageType::Grupo));
    (Services::local(store, Arc::clone(&storage)), storage)
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn admin_login_persists_session() {
    let (services, storage) = local_services();

    let response = services.auth.login(login("admin@escola.com", "admin123")).await.unwrap();

    assert_eq!(response.token, "mock-token-admin-1");
    assert_eq!(response.expires_in, 3600);
    let raw = storage.get(SESSION_KEY).unwrap().unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["role"], "admin");
    assert!(services.auth.is_authenticated());
}

#[tokio::test]
async fn wrong_password_leaves_no_session() {
    let (services, storage) = local_services();

    let result = services.auth.login(login("admin@escola.com", "wrong")).await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
    assert!(storage.get(SESSION_KEY).unwrap().is_none());
    assert!(!services.auth.is_authenticated());
}

#[tokio::test]
async fn student_login_uses_shared_password() {
    let (services, _storage) = local_services();

    let response = services
        .auth
        .login(login("bruno.costa@email.com", "aluno123"))
        .await
        .unwrap();

    assert_eq!(response.user.role, UserRole::Student);
    assert_eq!(response.user.student_id.as_deref(), Some("STD0002"));
}

#[tokio::test]
async fn session_restores_and_clears() {
    let (services, _storage) = local_services();

    let session = AuthSession::new(Arc::clone(&services.auth));
    assert!(!session.is_authenticated());
    assert!(!session.login("admin@escola.com", "wrong").await);
    assert!(session.user().is_none());

    assert!(session.login("admin@escola.com", "admin123").await);
    assert!(session.is_admin());
    assert!(!session.is_student());

    // Uma nova sessão sobre o mesmo armazenamento já nasce autenticada
    let restored = AuthSession::new(Arc::clone(&services.auth));
    assert_eq!(restored.user().map(|u| u.id), Some("admin-1".to_string()));

    restored.logout().await;
    assert!(!restored.is_authenticated());
    assert!(services.auth.current_user().is_none());
}

#[tokio::test]
async fn refreshed_token_is_mock_token() {
    let (services, _storage) = local_services();
    let token = services.auth.refresh_token().await.unwrap();
    assert!(token.starts_with("mock-refreshed-token-"));
}

#[tokio::test]
async fn student_service_create_search_and_filter() {
    let (services, _storage) = local_services();

    let created = services
        .students
        .create(CreateStudentRequest {
            name: "Carla Souza".to_string(),
            email: "carla@email.com".to_string(),
            phone: "(11) 91111-2222".to_string(),
            age: 31,
            instrument: Instrument::Bateria,
            experience_level: ExperienceLevel::Avancado,
            goals: "Gravar um álbum".to_string(),
            available_for_group: false,
            package_type: PackageType::Grupo,
            monthly_fee: Some(Decimal::from(999)),
        })
        .await
        .unwrap();

    assert_eq!(created.id, "STD0003");
    assert_eq!(created.monthly_fee, Decimal::from(108));
    assert_eq!(created.goals, "Gravar um álbum");

    let found = services.students.search("CARLA").await.unwrap();
    assert_eq!(found.len(), 1);
    let by_email = services.students.search("costa@").await.unwrap();
    assert_eq!(by_email[0].id, "STD0002");

    let drummers = services.students.get_by_instrument(Instrument::Bateria).await.unwrap();
    assert_eq!(drummers.len(), 1);
    assert!(services.students.get_by_id("STD0042").await.unwrap().is_none());
}

#[tokio::test]
async fn changing_package_recomputes_fee() {
    let (services, _storage) = local_services();

    let updated = services
        .students
        .update(
            "STD0001",
            UpdateStudentRequest {
                package_type: Some(PackageType::Grupo),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.monthly_fee, Decimal::from(108));

    let missing = services
        .students
        .update("STD0099", UpdateStudentRequest::default())
        .await;
    assert!(matches!(missing, Err(AppError::StudentNotFound(_))));
}

#[tokio::test]
async fn payment_service_rules() {
    let (services, _storage) = local_services();

    let payment = services
        .payments
        .create(CreatePaymentRequest {
            student_id: "STD0001".to_string(),
            month: "2024-05".to_string(),
            amount: Decimal::from(120),
        })
        .await
        .unwrap();
    assert_eq!(payment.id, "PAYSTD0001202405");
    assert_eq!(payment.student_name, "Ana Silva");

    let duplicate = services
        .payments
        .create(CreatePaymentRequest {
            student_id: "STD0001".to_string(),
            month: "2024-05".to_string(),
            amount: Decimal::from(120),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::PaymentAlreadyExists { .. })));

    let summary = services.payments.get_summary().await.unwrap();
    assert_eq!(summary.total_overdue, Decimal::from(120));
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(services.payments.get_overdue_payments().await.unwrap().len(), 1);

    let bad_month = services.payments.record_payment("STD0001", "2024-5").await;
    assert!(matches!(bad_month, Err(AppError::InvalidMonth(_))));
    let ghost = services.payments.record_payment("STD0404", "2024-05").await;
    assert!(matches!(ghost, Err(AppError::StudentNotFound(_))));

    services.payments.record_payment("STD0001", "2024-05").await.unwrap();
    let summary = services.payments.get_summary().await.unwrap();
    assert_eq!(summary.total_paid, Decimal::from(120));
    assert_eq!(summary.overdue_count, 0);
}

#[tokio::test]
async fn dashboard_counts_students_and_revenue() {
    let (services, _storage) = local_services();
    let dashboard = DashboardService::new(Arc::clone(&services.students));

    let stats = dashboard.get_stats().await.unwrap();
    assert_eq!(stats.total_students, 2);
    assert_eq!(stats.pending_payments, 2);
    assert_eq!(stats.expected_revenue, Decimal::from(228));
    assert_eq!(stats.revenue_progress, Decimal::ZERO);
    assert_eq!(stats.avg_monthly_per_student, Decimal::ZERO);

    // Ana paga; Bruno passa a dever dois meses
    services.payments.record_payment("STD0001", "2024-06").await.unwrap();
    services
        .students
        .update(
            "STD0002",
            UpdateStudentRequest {
                payment_status: Some(PaymentStatus::Atrasado),
                overdue_months: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = dashboard.get_stats().await.unwrap();
    assert_eq!(stats.active_students, 1);
    assert_eq!(stats.overdue_payments, 1);
    assert_eq!(stats.monthly_revenue, Decimal::from(120));
    assert_eq!(stats.avg_monthly_per_student, Decimal::from(120));
    assert_eq!(stats.active_percent, Decimal::from(50));
    assert_eq!(stats.payment_collection_rate, Decimal::from(50));
    assert_eq!(stats.revenue_progress, Decimal::new(5263, 2));
    assert_eq!(stats.total_overdue_debt, Decimal::from(216));

    assert_eq!(stats.students_by_instrument.len(), 1);
    let violao = &stats.students_by_instrument[0];
    assert_eq!(violao.instrument, Instrument::Violao);
    assert_eq!(violao.students, 2);
    assert_eq!((violao.paid, violao.pending, violao.overdue), (1, 0, 1));
    assert_eq!(violao.paid_percentage, 50);
}

#[tokio::test]
async fn mock_factory_needs_a_store() {
    let storage = memory_storage();
    let factory = ServiceFactory::new(
        ServiceMode::Mock,
        "http://localhost:5000/api",
        Duration::from_secs(5),
        Arc::clone(&storage),
    );

    assert_eq!(factory.mode(), ServiceMode::Mock);
    assert!(factory.build(None).is_err());

    let store = open_store(&storage, 3);
    let services = factory.build(Some(store)).unwrap();
    assert_eq!(services.students.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn config_picks_the_service_implementation() {
    let mut config = AppConfig {
        data_dir: PathBuf::from("./data"),
        port: 5000,
        jwt_secret: "segredo".to_string(),
        service_mode: ServiceMode::Mock,
        api_url: "http://localhost:5000/api".to_string(),
        api_timeout: Duration::from_secs(5),
        seed_students: 4,
        seed: 42,
    };
    let storage = memory_storage();
    let store = open_store(&storage, config.seed_students);

    let factory = config.service_factory(Arc::clone(&storage));
    assert_eq!(factory.mode(), ServiceMode::Mock);
    let services = factory.build(Some(store)).unwrap();
    assert_eq!(services.students.get_all().await.unwrap().len(), 4);

    config.service_mode = ServiceMode::Http;
    let factory = config.service_factory(storage);
    assert_eq!(factory.mode(), ServiceMode::Http);
    assert!(factory.build(None).is_ok());
}
