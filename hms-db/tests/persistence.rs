//! Round trips against a live Postgres.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p hms-db -- --ignored
//!
//! Each test works inside a transaction that is rolled back at the end, so
//! the database is left as it was found.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{Days, NaiveDate, Utc};
use hms_db::db::{
    AdmissionRepo, AppointmentRepo, BillingRepo, DepartmentRepo, DrugRepo, MedicalTestRepo,
    PatientRepo, PrescriptionRepo, RoleRepo, TransactionRepo, UserRepo, VitalSignRepo, WardRepo,
};
use hms_db::models::{
    NewAdmission, NewAppointment, NewBilling, NewDepartment, NewDrug, NewMedicalTest,
    NewMedicalTestResult, NewPatient, NewPatientExpense, NewPrescription, NewRole, NewTransaction,
    NewUser, NewVitalSign, NewWard, Pagination, StandardRole,
};
use hms_db::{schema, DbConfig, DbError, SessionProvider};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

static SCHEMA_APPLIED: Mutex<bool> = Mutex::const_new(false);
static SEQ: AtomicUsize = AtomicUsize::new(0);

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = hms_db::db::connect(&url).await.expect("pool creation failed");

    let mut applied = SCHEMA_APPLIED.lock().await;
    if !*applied {
        schema::apply(&pool).await.expect("schema apply failed");
        *applied = true;
    }

    pool
}

async fn begin(pool: &PgPool) -> Transaction<'static, Postgres> {
    pool.begin().await.expect("begin failed")
}

/// Username unlikely to collide with rows left by other runs.
fn unique_name(prefix: &str) -> String {
    format!(
        "{prefix}_{}_{}_{}",
        std::process::id(),
        Utc::now().timestamp_micros(),
        SEQ.fetch_add(1, Ordering::SeqCst)
    )
}

fn new_user(username: &str) -> NewUser {
    NewUser::new(username, "s3cret", "staff@hospital.test", "5550100", "+1")
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_is_complete_after_apply() {
    let pool = pool().await;

    // Applying twice is harmless
    schema::apply(&pool).await.unwrap();
    assert!(schema::missing_tables(&pool).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn user_round_trip_fills_defaults() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;
    let username = unique_name("nurse");

    let created = UserRepo::new(&mut *tx)
        .create(&new_user(&username))
        .await
        .unwrap();
    assert!(created.is_active);
    assert_eq!(created.username, username);

    let fetched = UserRepo::new(&mut *tx).get(created.user_id).await.unwrap();
    assert_eq!(fetched.email, "staff@hospital.test");
    assert_eq!(fetched.date_added, created.date_added);

    let found = UserRepo::new(&mut *tx)
        .find_by_username(&username)
        .await
        .unwrap()
        .expect("user by name");
    assert_eq!(found.user_id, created.user_id);

    let inactive = UserRepo::new(&mut *tx)
        .deactivate(created.user_id)
        .await
        .unwrap();
    assert!(!inactive.is_active);

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_user_is_not_found() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let err = UserRepo::new(&mut *tx).get(i32::MAX).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "user", .. }));

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn blank_required_field_is_rejected_before_sql() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let mut user = new_user(&unique_name("blank"));
    user.email = String::new();

    let err = UserRepo::new(&mut *tx).create(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn null_required_column_is_not_null_violation() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let err: DbError = sqlx::query("INSERT INTO users (username) VALUES ($1)")
        .bind(unique_name("partial"))
        .execute(&mut *tx)
        .await
        .unwrap_err()
        .into();
    assert!(matches!(err, DbError::NotNullViolation(_)), "{err:?}");

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn link_to_missing_user_is_foreign_key_violation() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let role = RoleRepo::new(&mut *tx)
        .create(&NewRole::named(unique_name("role")))
        .await
        .unwrap();

    let err = RoleRepo::new(&mut *tx)
        .assign(i32::MAX, role.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation(_)), "{err:?}");

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn doctor_role_resolves_by_username() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;
    let username = unique_name("dr_jane");

    let user = UserRepo::new(&mut *tx)
        .create(&new_user(&username))
        .await
        .unwrap();
    RoleRepo::new(&mut *tx).seed_standard_roles().await.unwrap();
    let doctor = RoleRepo::new(&mut *tx)
        .find_by_name(StandardRole::Doctor.name())
        .await
        .unwrap()
        .expect("seeded doctor role");

    RoleRepo::new(&mut *tx)
        .assign(user.user_id, doctor.id)
        .await
        .unwrap();

    let names = RoleRepo::new(&mut *tx)
        .role_names_for_username(&username)
        .await
        .unwrap();
    assert_eq!(names, vec!["Doctor".to_string()]);

    let doctors = RoleRepo::new(&mut *tx)
        .users_with_role("Doctor")
        .await
        .unwrap();
    assert!(doctors.iter().any(|u| u.user_id == user.user_id));

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn seeding_roles_twice_creates_nothing_new() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    RoleRepo::new(&mut *tx).seed_standard_roles().await.unwrap();
    let second = RoleRepo::new(&mut *tx).seed_standard_roles().await.unwrap();
    assert!(second.is_empty());

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn reassigning_a_link_bumps_date_modified() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let user = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("porter")))
        .await
        .unwrap();
    let mut departments = DepartmentRepo::new(&mut *tx);
    let er = departments
        .create(&NewDepartment::named("Emergency"))
        .await
        .unwrap();
    let icu = departments
        .create(&NewDepartment::named("Intensive Care"))
        .await
        .unwrap();

    let link = departments
        .assign(user.user_id, er.department_id)
        .await
        .unwrap();

    // clock_timestamp() advances within a transaction; make the gap visible
    tokio::time::sleep(Duration::from_millis(20)).await;

    let moved = departments
        .reassign(link.id, icu.department_id)
        .await
        .unwrap();
    assert_eq!(moved.department_id, icu.department_id);
    assert!(moved.date_modified > link.date_modified);

    let names = departments
        .department_names_for_username(&user.username)
        .await
        .unwrap();
    assert_eq!(names, vec!["Intensive Care".to_string()]);

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn patient_care_records_round_trip() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let doctor = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("doctor")))
        .await
        .unwrap();

    let mut patient = NewPatient::named("Ada", unique_name("Obi"));
    patient.user_id = Some(doctor.user_id);
    patient.date_of_birth = NaiveDate::from_ymd_opt(1980, 4, 2);
    let patient = PatientRepo::new(&mut *tx).create(&patient).await.unwrap();

    let found = PatientRepo::new(&mut *tx)
        .search_by_name(&patient.last_name, Pagination::default())
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].patient_id, patient.patient_id);

    let appointment = AppointmentRepo::new(&mut *tx)
        .create(&NewAppointment {
            patient_id: Some(patient.patient_id),
            user_id: Some(doctor.user_id),
            appointment_type: Some("checkup".into()),
            status: Some("scheduled".into()),
            ..NewAppointment::default()
        })
        .await
        .unwrap();

    let done = AppointmentRepo::new(&mut *tx)
        .set_status(appointment.appointment_id, "completed")
        .await
        .unwrap();
    assert_eq!(done.status.as_deref(), Some("completed"));

    VitalSignRepo::new(&mut *tx)
        .record(&NewVitalSign {
            patient_id: Some(patient.patient_id),
            user_id: Some(doctor.user_id),
            heart_rate: Some(72),
            blood_pressure: Some("120/80".into()),
            ..NewVitalSign::default()
        })
        .await
        .unwrap();
    let latest = VitalSignRepo::new(&mut *tx)
        .latest_for_patient(patient.patient_id)
        .await
        .unwrap()
        .expect("vitals recorded");
    assert_eq!(latest.heart_rate, Some(72));

    let test = MedicalTestRepo::new(&mut *tx)
        .create(&NewMedicalTest {
            test_name: Some("Full blood count".into()),
            test_price: Some(25.0),
            ..NewMedicalTest::default()
        })
        .await
        .unwrap();
    MedicalTestRepo::new(&mut *tx)
        .record_result(&NewMedicalTestResult {
            medical_test_id: Some(test.test_id),
            appointment_id: Some(appointment.appointment_id),
            user_id: Some(doctor.user_id),
            patient_id: Some(patient.patient_id),
            date_performed: None,
        })
        .await
        .unwrap();
    let results = MedicalTestRepo::new(&mut *tx)
        .results_for_patient(patient.patient_id)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.as_deref(), Some("Full blood count"));

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn admission_and_billing_round_trip() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let clerk = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("clerk")))
        .await
        .unwrap();
    let patient = PatientRepo::new(&mut *tx)
        .create(&NewPatient::named("Sam", unique_name("Reyes")))
        .await
        .unwrap();
    let ward = WardRepo::new(&mut *tx)
        .create(&NewWard {
            ward_number: Some(7),
            ward_type: Some("general".into()),
            price_per_night: Some(120.0),
            date_added: None,
        })
        .await
        .unwrap();

    let admission = AdmissionRepo::new(&mut *tx)
        .admit(&NewAdmission {
            patient_id: Some(patient.patient_id),
            ward_id: Some(ward.ward_id),
            admitted_by: Some(clerk.user_id),
            status: Some("admitted".into()),
            ..NewAdmission::default()
        })
        .await
        .unwrap();
    assert!(!admission.is_discharged());

    let on_ward = AdmissionRepo::new(&mut *tx)
        .current_in_ward(ward.ward_id)
        .await
        .unwrap();
    assert_eq!(on_ward.len(), 1);

    let today = Utc::now().date_naive();
    let discharged = AdmissionRepo::new(&mut *tx)
        .discharge(admission.admission_id, today)
        .await
        .unwrap();
    assert!(discharged.is_discharged());
    assert!(AdmissionRepo::new(&mut *tx)
        .current_in_ward(ward.ward_id)
        .await
        .unwrap()
        .is_empty());

    let mut billing = BillingRepo::new(&mut *tx);
    for amount in [120.0, 45.5] {
        billing
            .record_expense(&NewPatientExpense {
                patient_id: Some(patient.patient_id),
                total_amount: Some(amount),
                expense_type: Some("ward".into()),
                ..NewPatientExpense::default()
            })
            .await
            .unwrap();
    }
    let total = billing
        .expense_total_for_patient(patient.patient_id)
        .await
        .unwrap();
    assert!((total - 165.5).abs() < f64::EPSILON);

    let bill = billing
        .create_bill(&NewBilling {
            patient_id: Some(patient.patient_id),
            user_id: Some(clerk.user_id),
            admission_id: Some(admission.admission_id),
            total_amount: Some(total),
            ..NewBilling::default()
        })
        .await
        .unwrap();
    assert_eq!(billing.get_bill(bill.bill_id).await.unwrap(), bill);

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn drug_stock_never_goes_negative() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;
    let today = Utc::now().date_naive();

    let mut drugs = DrugRepo::new(&mut *tx);
    let drug = drugs
        .create(&NewDrug {
            drug_name: Some(unique_name("amoxicillin")),
            quantity_available: Some(10),
            expiry_date: today.checked_sub_days(Days::new(1)),
            ..NewDrug::default()
        })
        .await
        .unwrap();

    let after = drugs.adjust_quantity(drug.drug_id, -4).await.unwrap();
    assert_eq!(after.quantity_available, Some(6));

    let err = drugs.adjust_quantity(drug.drug_id, -7).await.unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
    assert_eq!(drugs.get(drug.drug_id).await.unwrap().quantity_available, Some(6));

    let err = drugs.adjust_quantity(i32::MAX, 1).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    let expiring = drugs.expiring_before(today).await.unwrap();
    assert!(expiring.iter().any(|d| d.drug_id == drug.drug_id));

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn provider_runs_units_of_work_and_rolls_back_failures() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    pool().await;
    let provider = SessionProvider::connect(&DbConfig::new(url)).await.unwrap();
    let username = unique_name("rollback");

    let name = username.clone();
    let err = provider
        .transaction(move |conn| {
            Box::pin(async move {
                UserRepo::new(conn).create(&new_user(&name)).await?;
                Err::<(), _>(DbError::not_found("ward", 0))
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    let lookup = username.clone();
    let found = provider
        .run(move |session| {
            Box::pin(async move { session.users().find_by_username(&lookup).await })
        })
        .await
        .unwrap();
    assert!(found.is_none(), "failed transaction must not persist");

    provider.close().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn link_to_missing_department_is_foreign_key_violation() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let user = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("orderly")))
        .await
        .unwrap();

    let err = DepartmentRepo::new(&mut *tx)
        .assign(user.user_id, i32::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation(_)), "{err:?}");

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn reassigning_a_role_bumps_date_modified() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let user = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("cover")))
        .await
        .unwrap();
    let mut roles = RoleRepo::new(&mut *tx);
    let nurse = roles.create(&NewRole::named(unique_name("nurse"))).await.unwrap();
    let pharmacist = roles
        .create(&NewRole::named(unique_name("pharmacist")))
        .await
        .unwrap();

    let link = roles.assign(user.user_id, nurse.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let moved = roles.reassign(link.id, pharmacist.id).await.unwrap();
    assert_eq!(moved.id, link.id);
    assert_eq!(moved.role_id, pharmacist.id);
    assert!(moved.date_modified > link.date_modified);

    let links = roles.links_for_user(user.user_id).await.unwrap();
    assert_eq!(links, vec![moved]);

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn prescription_and_payment_round_trip() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;

    let doctor = UserRepo::new(&mut *tx)
        .create(&new_user(&unique_name("prescriber")))
        .await
        .unwrap();
    let patient = PatientRepo::new(&mut *tx)
        .create(&NewPatient::named("Lena", unique_name("Park")))
        .await
        .unwrap();
    let appointment = AppointmentRepo::new(&mut *tx)
        .create(&NewAppointment {
            patient_id: Some(patient.patient_id),
            user_id: Some(doctor.user_id),
            ..NewAppointment::default()
        })
        .await
        .unwrap();

    let prescription = PrescriptionRepo::new(&mut *tx)
        .create(&NewPrescription {
            appointment_id: Some(appointment.appointment_id),
            user_id: Some(doctor.user_id),
            patient_id: Some(patient.patient_id),
            prescription_type: Some("drug".into()),
            item_id: Some(12),
            prescription_details: Some("500mg twice daily".into()),
            date_prescribed: None,
        })
        .await
        .unwrap();
    assert_eq!(
        PrescriptionRepo::new(&mut *tx)
            .get(prescription.prescription_id)
            .await
            .unwrap(),
        prescription
    );
    let by_appointment = PrescriptionRepo::new(&mut *tx)
        .for_appointment(appointment.appointment_id)
        .await
        .unwrap();
    assert_eq!(by_appointment, vec![prescription.clone()]);
    let by_patient = PrescriptionRepo::new(&mut *tx)
        .for_patient(patient.patient_id)
        .await
        .unwrap();
    assert_eq!(by_patient, vec![prescription]);

    let payment = TransactionRepo::new(&mut *tx)
        .create(&NewTransaction {
            appointment_id: Some(appointment.appointment_id),
            transaction_type: Some("payment".into()),
            amount: Some(80.0),
            payment_method: Some("card".into()),
            ..NewTransaction::default()
        })
        .await
        .unwrap();
    assert_eq!(
        TransactionRepo::new(&mut *tx)
            .get(payment.transaction_id)
            .await
            .unwrap(),
        payment
    );
    let payments = TransactionRepo::new(&mut *tx)
        .for_appointment(appointment.appointment_id)
        .await
        .unwrap();
    assert_eq!(payments, vec![payment]);

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn page_past_the_end_keeps_total() {
    let pool = pool().await;
    let mut tx = begin(&pool).await;
    let surname = unique_name("Mensah");

    let mut patients = PatientRepo::new(&mut *tx);
    for first in ["Kofi", "Ama", "Yaw"] {
        patients
            .create(&NewPatient::named(first, surname.clone()))
            .await
            .unwrap();
    }

    let second = patients
        .search_by_name(&surname, Pagination::new(2, 2))
        .await
        .unwrap();
    assert_eq!((second.total, second.items.len()), (3, 1));

    let third = patients
        .search_by_name(&surname, Pagination::new(3, 2))
        .await
        .unwrap();
    assert!(third.items.is_empty());
    assert_eq!(third.total, 3);
    assert_eq!(third.total_pages(), 2);
    assert!(!third.has_next());

    tx.rollback().await.unwrap();
}
