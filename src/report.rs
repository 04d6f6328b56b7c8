//! CSV reports and the plain-text community listing.
//!
//! A report is a `Serialize` struct registered with [`define_report!`](crate::define_report).
//! Each report type is written to its own CSV file, opened with
//! [`ContextReportExt::add_report`]; every [`ContextReportExt::send_report`] appends one row.
use std::any::TypeId;
use std::cell::RefCell;
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::Path;

use csv::Writer;
use log::{error, trace};
use serde::Serialize;

use crate::community::workplace::{WorkplaceActivity, WorkplaceEvent};
use crate::community::{Community, ContextCommunityExt, InfectionStatus, PersonId, PlaceId};
use crate::context::Context;
use crate::define_data_plugin;
use crate::error::EpidemicError;
use crate::hashing::HashMap;

pub trait Report: 'static {
    /// Returns report type
    fn type_id(&self) -> TypeId;
    /// Appends this report as one row
    ///
    /// # Errors
    ///
    /// Returns the writer's error if the row cannot be serialized.
    fn serialize(&self, writer: &mut Writer<File>) -> Result<(), csv::Error>;
}

/// Use this macro to define a unique report type
#[macro_export]
macro_rules! define_report {
    ($name:ident) => {
        impl $crate::report::Report for $name {
            fn type_id(&self) -> std::any::TypeId {
                std::any::TypeId::of::<$name>()
            }

            fn serialize(
                &self,
                writer: &mut $crate::csv::Writer<std::fs::File>,
            ) -> Result<(), $crate::csv::Error> {
                writer.serialize(self)
            }
        }
    };
}

struct ReportData {
    file_writers: RefCell<HashMap<TypeId, Writer<File>>>,
}

// Maps each report type to the writer for its file.
define_data_plugin!(
    ReportPlugin,
    ReportData,
    ReportData {
        file_writers: RefCell::new(HashMap::default()),
    }
);

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful. Called by `add_report`
fn generate_validate_filepath(path: &Path) -> Result<File, EpidemicError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(EpidemicError::EpidemicError(format!(
            "Report output files must be CSVs: {}",
            path.display()
        ))),
    }
}

pub trait ContextReportExt {
    /// Call `add_report` with each report type, passing the path of the file to write it to.
    ///
    /// # Errors
    ///
    /// Returns an `EpidemicError` if the path is not a CSV file or cannot be created.
    fn add_report<T: Report>(&mut self, path: &Path) -> Result<(), EpidemicError>;

    /// Write a new row with columns following items in the report struct
    /// to the report file associated with the report type struct.
    ///
    /// # Errors
    ///
    /// Returns an `EpidemicError` if the row cannot be written.
    ///
    /// # Panics
    ///
    /// Panics if `add_report` has not been called for this report type.
    fn send_report<T: Report>(&self, report: T) -> Result<(), EpidemicError>;
}

impl ContextReportExt for Context {
    fn add_report<T: Report>(&mut self, path: &Path) -> Result<(), EpidemicError> {
        trace!("adding report {}", path.display());
        let file = generate_validate_filepath(path)?;

        let data_container = self.get_data_container_mut(ReportPlugin);
        let writer = Writer::from_writer(file);
        let mut file_writer = data_container.file_writers.borrow_mut();
        file_writer.insert(TypeId::of::<T>(), writer);
        Ok(())
    }

    fn send_report<T: Report>(&self, report: T) -> Result<(), EpidemicError> {
        // No data container will exist if no reports have been added
        let data_container = self
            .get_data_container(ReportPlugin)
            .expect("No writer found for the report type");
        let mut writer_cell = data_container.file_writers.borrow_mut();
        let writer = writer_cell
            .get_mut(&report.type_id())
            .expect("No writer found for the report type");
        report.serialize(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// One row per person, in the order the population is visited.
#[derive(Serialize)]
pub struct PersonReport {
    pub person: PersonId,
    pub home: PlaceId,
    pub status: InfectionStatus,
    pub workplace: Option<PlaceId>,
}

define_report!(PersonReport);

/// One row per place, in creation order.
#[derive(Serialize)]
pub struct PlaceReport {
    pub place: PlaceId,
    pub kind: &'static str,
    pub capacity: usize,
    pub occupants: usize,
}

define_report!(PlaceReport);

/// One row per workplace opening or closing.
#[derive(Serialize)]
pub struct WorkplaceEventReport {
    pub time: f64,
    pub workplace: PlaceId,
    pub activity: WorkplaceActivity,
}

define_report!(WorkplaceEventReport);

/// Writes `people.csv` and `places.csv` for the community in `context` to `output_dir`, and
/// records every workplace event from now on in `workplace_events.csv`.
///
/// # Errors
///
/// Returns an `EpidemicError` if a report file cannot be created or written.
///
/// # Panics
///
/// Panics if no community has been synthesized in `context`.
pub fn write_community_reports(
    context: &mut Context,
    output_dir: &Path,
) -> Result<(), EpidemicError> {
    context.add_report::<PersonReport>(&output_dir.join("people.csv"))?;
    context.add_report::<PlaceReport>(&output_dir.join("places.csv"))?;
    context.add_report::<WorkplaceEventReport>(&output_dir.join("workplace_events.csv"))?;

    let community = context
        .get_community()
        .expect("A community must be synthesized before it is reported");
    for person in community.people() {
        context.send_report(PersonReport {
            person: person.id(),
            home: person.home(),
            status: person.infection_status(),
            workplace: person.workplace(),
        })?;
    }
    for place in community.places() {
        context.send_report(PlaceReport {
            place: place.id(),
            kind: if place.is_home() { "Home" } else { "Workplace" },
            capacity: place.capacity(),
            occupants: place.occupants().len(),
        })?;
    }

    context.subscribe_to_event(|context, event: WorkplaceEvent| {
        let report = WorkplaceEventReport {
            time: event.time,
            workplace: event.workplace,
            activity: event.kind,
        };
        if let Err(e) = context.send_report(report) {
            error!("failed to record workplace event: {e}");
        }
    });
    Ok(())
}

/// Writes every person and then every place, one per line.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_community_listing(community: &Community, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "People")?;
    for person in community.people() {
        writeln!(out, "{person}")?;
    }
    writeln!(out, "Places")?;
    for place in community.places() {
        writeln!(out, "{place}")?;
    }
    Ok(())
}
