//! Relational schema for the hospital tables
//!
//! `apply` is idempotent and safe to run on every startup. Tables are
//! created parent-first so each REFERENCES clause resolves. There are no
//! ON DELETE actions: rows are deactivated or re-statused, never removed.

use sqlx::PgPool;

use crate::Result;

/// Every table, in creation order.
pub const TABLES: [&str; 17] = [
    "users",
    "roles",
    "user_roles",
    "departments",
    "user_departments",
    "patients",
    "appointments",
    "vital_signs",
    "prescriptions",
    "medical_tests",
    "medical_test_results",
    "drugs",
    "wards",
    "admissions",
    "patient_expenses",
    "billings",
    "transactions",
];

/// Tables whose `date_modified` is bumped on every UPDATE.
const TOUCHED_TABLES: [&str; 2] = ["user_roles", "user_departments"];

const CREATE_TABLES: [&str; 17] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        username VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone_number VARCHAR(255) NOT NULL,
        country_code VARCHAR(255) NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        date_added TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id SERIAL PRIMARY KEY,
        role_name VARCHAR(655),
        description VARCHAR(655),
        date_created TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_roles (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(user_id),
        role_id INTEGER NOT NULL REFERENCES roles(id),
        date_modified TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        department_id SERIAL PRIMARY KEY,
        department_name VARCHAR(255) NOT NULL,
        date_created TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_departments (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(user_id),
        department_id INTEGER NOT NULL REFERENCES departments(department_id),
        date_modified TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS patients (
        patient_id SERIAL PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        gender VARCHAR(10),
        date_of_birth DATE,
        contact_number VARCHAR(20),
        address VARCHAR(255),
        emergency_contact_name VARCHAR(255),
        emergency_contact_phone_number VARCHAR(255),
        health_insurance_number VARCHAR(255),
        health_insurance_provider VARCHAR(255),
        medical_history TEXT,
        user_id INTEGER REFERENCES users(user_id),
        date_added TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        appointment_id SERIAL PRIMARY KEY,
        patient_id INTEGER REFERENCES patients(patient_id),
        user_id INTEGER REFERENCES users(user_id),
        department_id INTEGER REFERENCES departments(department_id),
        appointment_details TEXT,
        appointment_date TIMESTAMP NOT NULL DEFAULT now(),
        appointment_type VARCHAR(20),
        status VARCHAR(20)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vital_signs (
        vital_signs_id SERIAL PRIMARY KEY,
        patient_id INTEGER REFERENCES patients(patient_id),
        user_id INTEGER REFERENCES users(user_id),
        heart_rate INTEGER,
        blood_pressure VARCHAR(20),
        temperature DOUBLE PRECISION,
        respiratory_rate INTEGER,
        oxygen_level DOUBLE PRECISION,
        height DOUBLE PRECISION,
        weight DOUBLE PRECISION,
        recorded_at TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prescriptions (
        prescription_id SERIAL PRIMARY KEY,
        appointment_id INTEGER REFERENCES appointments(appointment_id),
        user_id INTEGER REFERENCES users(user_id),
        patient_id INTEGER REFERENCES patients(patient_id),
        prescription_type VARCHAR(255),
        item_id INTEGER,
        prescription_details TEXT,
        date_prescribed TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS medical_tests (
        test_id SERIAL PRIMARY KEY,
        test_name VARCHAR(255),
        test_details TEXT,
        test_price DOUBLE PRECISION,
        date_added TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS medical_test_results (
        result_id SERIAL PRIMARY KEY,
        medical_test_id INTEGER REFERENCES medical_tests(test_id),
        appointment_id INTEGER REFERENCES appointments(appointment_id),
        user_id INTEGER REFERENCES users(user_id),
        patient_id INTEGER REFERENCES patients(patient_id),
        date_performed TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS drugs (
        drug_id SERIAL PRIMARY KEY,
        drug_name VARCHAR(255),
        manufacturer VARCHAR(255),
        expiry_date DATE,
        price DOUBLE PRECISION,
        quantity_available INTEGER,
        date_added TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS wards (
        ward_id SERIAL PRIMARY KEY,
        ward_number INTEGER,
        ward_type VARCHAR(255),
        price_per_night DOUBLE PRECISION,
        date_added TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admissions (
        admission_id SERIAL PRIMARY KEY,
        patient_id INTEGER REFERENCES patients(patient_id),
        ward_id INTEGER REFERENCES wards(ward_id),
        admission_date TIMESTAMP NOT NULL DEFAULT now(),
        discharge_date DATE,
        admitted_by INTEGER REFERENCES users(user_id),
        admitted_note TEXT,
        status VARCHAR(20)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS patient_expenses (
        expense_id SERIAL PRIMARY KEY,
        patient_id INTEGER REFERENCES patients(patient_id),
        appointment_id INTEGER REFERENCES appointments(appointment_id),
        item_id VARCHAR(255),
        total_amount DOUBLE PRECISION,
        expense_type VARCHAR(255),
        date_created TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS billings (
        bill_id SERIAL PRIMARY KEY,
        patient_id INTEGER REFERENCES patients(patient_id),
        user_id INTEGER REFERENCES users(user_id),
        admission_id INTEGER REFERENCES admissions(admission_id),
        appointment_id INTEGER REFERENCES appointments(appointment_id),
        total_amount DOUBLE PRECISION,
        billing_date TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        transaction_id SERIAL PRIMARY KEY,
        appointment_id INTEGER REFERENCES appointments(appointment_id),
        transaction_date TIMESTAMP NOT NULL DEFAULT now(),
        transaction_type VARCHAR(20),
        amount DOUBLE PRECISION,
        payment_method VARCHAR(255),
        transaction_details TEXT
    )
    "#,
];

/// (index name, table, column) for every foreign key and lookup column.
const INDEXES: [(&str, &str, &str); 24] = [
    ("idx_users_username", "users", "username"),
    ("idx_user_roles_user", "user_roles", "user_id"),
    ("idx_user_roles_role", "user_roles", "role_id"),
    ("idx_user_departments_user", "user_departments", "user_id"),
    ("idx_user_departments_department", "user_departments", "department_id"),
    ("idx_patients_user", "patients", "user_id"),
    ("idx_appointments_patient", "appointments", "patient_id"),
    ("idx_appointments_user", "appointments", "user_id"),
    ("idx_appointments_department", "appointments", "department_id"),
    ("idx_vital_signs_patient", "vital_signs", "patient_id"),
    ("idx_prescriptions_appointment", "prescriptions", "appointment_id"),
    ("idx_prescriptions_patient", "prescriptions", "patient_id"),
    ("idx_medical_test_results_test", "medical_test_results", "medical_test_id"),
    ("idx_medical_test_results_patient", "medical_test_results", "patient_id"),
    ("idx_drugs_expiry", "drugs", "expiry_date"),
    ("idx_admissions_patient", "admissions", "patient_id"),
    ("idx_admissions_ward", "admissions", "ward_id"),
    ("idx_patient_expenses_patient", "patient_expenses", "patient_id"),
    ("idx_patient_expenses_appointment", "patient_expenses", "appointment_id"),
    ("idx_billings_patient", "billings", "patient_id"),
    ("idx_billings_admission", "billings", "admission_id"),
    ("idx_billings_appointment", "billings", "appointment_id"),
    ("idx_transactions_appointment", "transactions", "appointment_id"),
    ("idx_vital_signs_recorded", "vital_signs", "recorded_at"),
];

/// Uses clock_timestamp() so two updates in one transaction still differ.
const TOUCH_FUNCTION: &str = r#"
    CREATE OR REPLACE FUNCTION hms_touch_date_modified() RETURNS TRIGGER AS $$
    BEGIN
        NEW.date_modified := clock_timestamp()::timestamp;
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql
"#;

/// Create all tables, indexes and triggers.
pub async fn apply(pool: &PgPool) -> Result<()> {
    tracing::info!("Applying hospital schema...");

    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }

    for (name, table, column) in INDEXES {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {name} ON {table}({column})"
        ))
        .execute(pool)
        .await?;
    }

    create_touch_triggers(pool).await?;

    tracing::info!(tables = TABLES.len(), "Hospital schema ready");
    Ok(())
}

async fn create_touch_triggers(pool: &PgPool) -> Result<()> {
    sqlx::query(TOUCH_FUNCTION).execute(pool).await?;

    for table in TOUCHED_TABLES {
        let trigger = format!("trg_{table}_date_modified");
        // CREATE OR REPLACE TRIGGER needs Postgres 14
        sqlx::query(&format!("DROP TRIGGER IF EXISTS {trigger} ON {table}"))
            .execute(pool)
            .await?;
        sqlx::query(&format!(
            "CREATE TRIGGER {trigger} BEFORE UPDATE ON {table} \
             FOR EACH ROW EXECUTE FUNCTION hms_touch_date_modified()"
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Tables from [`TABLES`] that do not exist in the current schema.
pub async fn missing_tables(pool: &PgPool) -> Result<Vec<&'static str>> {
    let present: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT table_name::text
        FROM information_schema.tables
        WHERE table_schema = current_schema()
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(TABLES
        .into_iter()
        .filter(|t| !present.iter().any(|p| p == t))
        .collect())
}
