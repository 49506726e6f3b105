/// Demo end-to-end del contrato `SchemeRepository`: alta de un scheme,
/// steps fuera de orden, listado ordenado, update parcial y remove con
/// snapshot. Corre siempre contra el backend in-memory; si `DATABASE_URL`
/// está definido repite el mismo guion contra SQLite.
use scheme_core::{NewScheme, NewStep, SchemeChanges, SchemeRepository, StoreError};

fn run_demo<R: SchemeRepository>(repo: &mut R) -> Result<(), StoreError> {
    let scheme = repo.add(NewScheme::new("Find the Holy Grail"))?;
    println!("created: {}", serde_json::to_string(&scheme).unwrap_or_default());

    // insertados fuera de orden: el listado sale igualmente por step_number
    repo.add_step(NewStep::new(2, "...and quest"), scheme.id)?;
    let steps = repo.add_step(NewStep::new(1, "quest"), scheme.id)?;
    for view in &steps {
        println!("step: {}", serde_json::to_string(view).unwrap_or_default());
    }

    let renamed = repo.update(SchemeChanges { scheme_name: Some("Find A Holy Grail".into()) }, scheme.id)?;
    println!("updated: {}", serde_json::to_string(&renamed).unwrap_or_default());

    let removed = repo.remove(scheme.id)?;
    println!("removed (pre-delete snapshot): {}",
             serde_json::to_string(&removed).unwrap_or_default());
    println!("read after remove: {:?}", repo.find_by_id(scheme.id)?);
    Ok(())
}

fn main() {
    println!("== schemeflow demo (in-memory) ==");
    let mut repo = scheme_core::InMemorySchemeRepository::new();
    if let Err(e) = run_demo(&mut repo) {
        eprintln!("in-memory demo failed: {e}");
    }

    scheme_persistence::init_dotenv();
    if std::env::var("DATABASE_URL").is_ok() {
        println!("== schemeflow demo (sqlite) ==");
        match scheme_persistence::build_dev_pool_from_env() {
            Ok(pool) => {
                let mut repo = scheme_persistence::SqliteSchemeRepository::from_pool(pool);
                if let Err(e) = run_demo(&mut repo) {
                    eprintln!("sqlite demo failed: {e}");
                }
            }
            Err(e) => eprintln!("no se pudo construir el pool: {e}"),
        }
    } else {
        println!("DATABASE_URL no definido: se omite el demo sqlite");
    }
}
