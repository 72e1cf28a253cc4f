use super::helpers::open_engine;
use anyhow::Result;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

// --------------------- Readers alongside a writer ---------------------

#[test]
fn concurrent_reads_with_single_writer() -> Result<()> {
    let dir = tempdir()?;
    let engine = Arc::new(open_engine(dir.path(), 1 << 20, false));

    // Seed a stable key range the readers will hammer.
    for i in 0..100u32 {
        engine.put(
            format!("stable-{:04}", i).into_bytes(),
            format!("value-{:04}", i).into_bytes(),
        )?;
    }

    let mut handles = Vec::new();
    for reader in 0..4u32 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            // Each reader owns a disjoint quarter of the key range.
            for _ in 0..50 {
                for i in (reader * 25)..((reader + 1) * 25) {
                    let key = format!("stable-{:04}", i);
                    let value = engine.get(key.as_bytes()).unwrap();
                    assert_eq!(value, format!("value-{:04}", i).into_bytes());
                }
            }
        }));
    }

    // One writer appends fresh keys while the readers run.
    {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..200u32 {
                engine
                    .put(
                        format!("fresh-{:04}", i).into_bytes(),
                        format!("new-{:04}", i).into_bytes(),
                    )
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Nothing was lost on either side.
    for i in 0..100u32 {
        assert_eq!(
            engine.get(format!("stable-{:04}", i).as_bytes())?,
            format!("value-{:04}", i).into_bytes()
        );
    }
    for i in 0..200u32 {
        assert_eq!(
            engine.get(format!("fresh-{:04}", i).as_bytes())?,
            format!("new-{:04}", i).into_bytes()
        );
    }
    Ok(())
}

#[test]
fn concurrent_writers_serialize_cleanly() -> Result<()> {
    let dir = tempdir()?;
    // Small threshold so the writers also race through rollovers.
    let engine = Arc::new(open_engine(dir.path(), 256, false));

    let mut handles = Vec::new();
    for writer in 0..4u32 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..100u32 {
                engine
                    .put(
                        format!("w{}-{:04}", writer, i).into_bytes(),
                        format!("v{}-{:04}", writer, i).into_bytes(),
                    )
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for writer in 0..4u32 {
        for i in 0..100u32 {
            assert_eq!(
                engine.get(format!("w{}-{:04}", writer, i).as_bytes())?,
                format!("v{}-{:04}", writer, i).into_bytes()
            );
        }
    }
    Ok(())
}

#[test]
fn interleaved_writes_survive_reopen() -> Result<()> {
    let dir = tempdir()?;
    {
        let engine = Arc::new(open_engine(dir.path(), 512, false));
        let mut handles = Vec::new();
        for writer in 0..2u32 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for i in 0..50u32 {
                    let key = format!("w{}-{:04}", writer, i).into_bytes();
                    engine.put(key.clone(), b"first".to_vec()).unwrap();
                    engine.put(key, format!("final-{}", i).into_bytes()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        engine.close()?;
    }

    let engine = open_engine(dir.path(), 512, false);
    for writer in 0..2u32 {
        for i in 0..50u32 {
            assert_eq!(
                engine.get(format!("w{}-{:04}", writer, i).as_bytes())?,
                format!("final-{}", i).into_bytes()
            );
        }
    }
    Ok(())
}
