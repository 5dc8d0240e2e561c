use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use clinic_core::config::resolve_data_dir;
use clinic_core::services::doctors::{self, ReportKind, WalkIn};
use clinic_core::services::patients::{self, RegisterPatient};
use clinic_core::validation::parse_date;
use clinic_core::{Appointment, Doctor, Patient, RecordStore, StoreConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic appointment records CLI")]
struct Cli {
    /// Directory holding the record files (defaults to CLINIC_DATA_DIR, then ./data)
    #[arg(long, global = true)]
    data_dir: Option<String>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PatientLogin {
    /// Registered ID (e.g. national ID)
    #[arg(long)]
    registered_id: String,
    #[arg(long)]
    password: String,
}

#[derive(Args)]
struct DoctorLogin {
    /// Doctor system ID, also the username
    #[arg(long)]
    doctor: String,
    #[arg(long)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List doctors
    Doctors {
        /// Only doctors with this specialization
        #[arg(long)]
        specialization: Option<String>,
    },
    /// List specializations
    Specializations,
    /// Register a new patient
    Register {
        name: String,
        registered_id: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// Medical history (optional)
        #[arg(long, default_value = "")]
        history: String,
    },
    /// Check patient credentials
    LoginPatient {
        #[command(flatten)]
        login: PatientLogin,
    },
    /// Check doctor credentials
    LoginDoctor {
        #[command(flatten)]
        login: DoctorLogin,
    },
    /// Show free slots for a doctor on a date
    Slots {
        doctor_id: String,
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Book an appointment
    Book {
        #[command(flatten)]
        login: PatientLogin,
        #[arg(long)]
        doctor: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time slot (HH:MM)
        time: String,
    },
    /// List the patient's upcoming appointments
    Upcoming {
        #[command(flatten)]
        login: PatientLogin,
    },
    /// Cancel one of the patient's appointments
    Cancel {
        #[command(flatten)]
        login: PatientLogin,
        appointment_id: String,
    },
    /// Show the doctor's schedule for a date (today by default)
    Schedule {
        #[command(flatten)]
        login: DoctorLogin,
        date: Option<String>,
    },
    /// Show the patient behind one of the doctor's appointments
    PatientDetails {
        #[command(flatten)]
        login: DoctorLogin,
        appointment_id: String,
    },
    /// Change an appointment's status
    SetStatus {
        #[command(flatten)]
        login: DoctorLogin,
        appointment_id: String,
        /// Booked, Confirmed, Completed, No Show or Rescheduled
        status: String,
    },
    /// Cancel an appointment on behalf of the clinic
    CancelByClinic {
        #[command(flatten)]
        login: DoctorLogin,
        appointment_id: String,
        /// Reason recorded in the appointment notes (optional)
        #[arg(long)]
        reason: Option<String>,
    },
    /// Add a walk-in appointment
    WalkIn {
        #[command(flatten)]
        login: DoctorLogin,
        #[arg(long)]
        name: String,
        /// Registered ID of the patient, if known
        #[arg(long)]
        registered_id: Option<String>,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time (HH:MM)
        time: String,
    },
    /// Generate a schedule report (today by default)
    Report {
        #[command(flatten)]
        login: DoctorLogin,
        /// Report on this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "month")]
        date: Option<String>,
        /// Monthly summary for this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

/// Entry point for the clinic CLI.
///
/// # Environment Variables
/// - `CLINIC_DATA_DIR`: directory for record files when `--data-dir` is not given
/// - `RUST_LOG`: log filter, on top of the default `clinic=info`
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = resolve_data_dir(
        cli.data_dir
            .or_else(|| std::env::var("CLINIC_DATA_DIR").ok()),
    );
    let cfg = Arc::new(StoreConfig::new(data_dir)?);
    let store = RecordStore::open(cfg).context("failed to open record store")?;

    let load = store.load_report();
    if !load.is_clean() {
        tracing::warn!("record files contain malformed rows: {:?}", load);
    }

    let json = cli.json;
    let now = Local::now().naive_local();

    match cli.command {
        Some(Commands::Doctors { specialization }) => {
            let doctors = match specialization {
                Some(spec) => patients::doctors_by_specialization(&store, &spec),
                None => store.all_doctors(),
            };
            emit(json, &doctors, |d| print_doctors(d))?;
        }
        Some(Commands::Specializations) => {
            emit(json, &patients::specializations(&store), |specs| {
                for spec in specs {
                    println!("{spec}");
                }
            })?;
        }
        Some(Commands::Register {
            name,
            registered_id,
            password,
            confirm_password,
            history,
        }) => {
            let patient = patients::register_patient(
                &store,
                RegisterPatient {
                    name,
                    registered_id,
                    password,
                    confirm_password,
                    medical_history: history,
                },
            )?;
            emit(json, &patient, |p| {
                println!("Registered {} with system ID {}", p.name, p.system_id);
            })?;
        }
        Some(Commands::LoginPatient { login }) => {
            let patient = login_patient(&store, &login)?;
            emit(json, &patient, print_patient)?;
        }
        Some(Commands::LoginDoctor { login }) => {
            let doctor = login_doctor(&store, &login)?;
            emit(json, &doctor, |d| {
                println!("Welcome, Dr. {} ({})", d.name, d.specialization);
            })?;
        }
        Some(Commands::Slots { doctor_id, date }) => {
            let day = parse_date(&date)?;
            let slots = patients::available_slots(&store, &doctor_id, day, now)?;
            emit(json, &slots, |slots| {
                if slots.is_empty() {
                    println!("No available slots on {date}.");
                }
                for slot in slots {
                    println!("{slot}");
                }
            })?;
        }
        Some(Commands::Book {
            login,
            doctor,
            date,
            time,
        }) => {
            let patient = login_patient(&store, &login)?;
            let appointment =
                patients::book_appointment(&store, &patient.system_id, &doctor, &date, &time, now)?;
            emit(json, &appointment, |a| {
                println!(
                    "Booked {} with {} on {} at {}",
                    a.appointment_id, a.doctor_system_id, a.date, a.time
                );
            })?;
        }
        Some(Commands::Upcoming { login }) => {
            let patient = login_patient(&store, &login)?;
            let upcoming = patients::upcoming_appointments(&store, &patient.system_id, now.date());
            emit(json, &upcoming, |a| print_appointments(a))?;
        }
        Some(Commands::Cancel {
            login,
            appointment_id,
        }) => {
            let patient = login_patient(&store, &login)?;
            let appointment =
                patients::cancel_appointment_by_patient(&store, &patient.system_id, &appointment_id)?;
            emit(json, &appointment, |a| {
                println!("Cancelled {} on {} at {}", a.appointment_id, a.date, a.time);
            })?;
        }
        Some(Commands::Schedule { login, date }) => {
            let doctor = login_doctor(&store, &login)?;
            let day = date_or_today(date.as_deref(), now)?;
            let schedule = doctors::day_schedule(&store, &doctor.system_id, day);
            emit(json, &schedule, |entries| {
                if entries.is_empty() {
                    println!("No appointments.");
                }
                for entry in entries {
                    println!(
                        "{}  {:<20} {:<8} {:<20} {}  [{}]",
                        entry.appointment.time,
                        entry.patient_label(),
                        entry.appointment.patient_system_id,
                        entry.appointment.status,
                        entry.appointment.notes,
                        entry.appointment.appointment_id
                    );
                }
            })?;
        }
        Some(Commands::PatientDetails {
            login,
            appointment_id,
        }) => {
            let doctor = login_doctor(&store, &login)?;
            let patient = doctors::appointment_patient(&store, &doctor.system_id, &appointment_id)?;
            emit(json, &patient, print_patient)?;
        }
        Some(Commands::SetStatus {
            login,
            appointment_id,
            status,
        }) => {
            let doctor = login_doctor(&store, &login)?;
            let appointment =
                doctors::set_status(&store, &doctor.system_id, &appointment_id, &status)?;
            emit(json, &appointment, |a| {
                println!("{} is now {}", a.appointment_id, a.status);
            })?;
        }
        Some(Commands::CancelByClinic {
            login,
            appointment_id,
            reason,
        }) => {
            let doctor = login_doctor(&store, &login)?;
            let appointment = doctors::cancel_by_clinic(
                &store,
                &doctor.system_id,
                &appointment_id,
                reason.as_deref(),
            )?;
            emit(json, &appointment, |a| {
                println!("Cancelled {} on {} at {}", a.appointment_id, a.date, a.time);
            })?;
        }
        Some(Commands::WalkIn {
            login,
            name,
            registered_id,
            date,
            time,
        }) => {
            let doctor = login_doctor(&store, &login)?;
            let appointment = doctors::add_walk_in(
                &store,
                &doctor.system_id,
                WalkIn {
                    patient_name: name,
                    registered_id,
                    date,
                    time,
                },
            )?;
            emit(json, &appointment, |a| {
                println!(
                    "Added walk-in {} for {} on {} at {}",
                    a.appointment_id, a.patient_system_id, a.date, a.time
                );
            })?;
        }
        Some(Commands::Report { login, date, month }) => {
            let doctor = login_doctor(&store, &login)?;
            let kind = match (date, month) {
                (Some(date), _) => ReportKind::Date(parse_date(&date)?),
                (None, Some(month)) => {
                    let first = parse_date(&format!("{}-01", month.trim()))
                        .with_context(|| format!("invalid month (expected YYYY-MM): {month}"))?;
                    ReportKind::Month {
                        year: first.year(),
                        month: first.month(),
                    }
                }
                (None, None) => ReportKind::Today,
            };
            let report = doctors::report(&store, &doctor.system_id, kind, now)?;
            emit(json, &report, |r| print!("{}", r.render()))?;
        }
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(())
}

fn login_patient(store: &RecordStore, login: &PatientLogin) -> anyhow::Result<Patient> {
    patients::login_patient(store, &login.registered_id, &login.password)
        .context("patient login failed")
}

fn login_doctor(store: &RecordStore, login: &DoctorLogin) -> anyhow::Result<Doctor> {
    doctors::login_doctor(store, &login.doctor, &login.password).context("doctor login failed")
}

fn date_or_today(date: Option<&str>, now: NaiveDateTime) -> anyhow::Result<NaiveDate> {
    match date {
        Some(date) => Ok(parse_date(date)?),
        None => Ok(now.date()),
    }
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_doctors(doctors: &[Doctor]) {
    if doctors.is_empty() {
        println!("No doctors found.");
    }
    for doctor in doctors {
        println!(
            "{}  {:<12} {}",
            doctor.system_id, doctor.name, doctor.specialization
        );
    }
}

fn print_patient(patient: &Patient) {
    println!("Patient Name: {}", patient.name);
    println!("Patient ID: {}", patient.system_id);
    println!("Registered ID: {}", patient.registered_id_number);
    if !patient.medical_history.is_empty() {
        println!("\nMedical History:\n{}", patient.medical_history);
    }
}

fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No upcoming appointments.");
    }
    for a in appointments {
        println!(
            "{}  {} {}  {:<8} {}",
            a.appointment_id, a.date, a.time, a.doctor_system_id, a.status
        );
    }
}
