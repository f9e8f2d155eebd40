#[cfg(test)]
mod network_scenarios {
    use std::fs;
    use std::io::Write;
    use std::sync::{Mutex, Once};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use tempfile::{NamedTempFile, TempDir};

    use lansim::config_loader::load_config;
    use lansim::registry::{NETWORK_FILE, SAVED_NETWORKS_FILE};
    use lansim::{Cell, Delivery, ErrorKind, JsonFileStore, NetworkService, GRID_SIZE};

    /// Keeps warning messages so tests can assert on them
    struct WarningLog;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static LOGGER: WarningLog = WarningLog;
    static INSTALL: Once = Once::new();

    impl Log for WarningLog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_warnings() {
        INSTALL.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Warn);
        });
    }

    fn warnings_mentioning(needle: &str) -> usize {
        WARNINGS.lock().unwrap().iter().filter(|w| w.contains(needle)).count()
    }

    fn open(dir: &TempDir) -> NetworkService<JsonFileStore> {
        NetworkService::open(JsonFileStore::new(dir.path()), 100).unwrap()
    }

    fn assert_unit_steps(path: &[Cell]) {
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1, "diagonal or jump {} -> {}", pair[0], pair[1]);
        }
    }

    /// Two hosts on 192.168.1.0/24 next to each other talk directly
    #[test]
    fn test_direct_delivery_between_neighbours() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);
        network.place_device(0, 0, "host", "192.168.1.10", 24).unwrap();
        network.place_device(0, 1, "host", "192.168.1.20", 24).unwrap();

        let report = network.send_packets(Cell::new(0, 0), Cell::new(0, 1), 1).unwrap();
        assert_eq!(report.delivery, Delivery::Direct);
        assert_eq!(report.path, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }

    /// Cross-subnet traffic passes both subnet routers in order
    #[test]
    fn test_cross_subnet_delivery_via_routers() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);
        network.place_device(0, 0, "host", "192.168.1.10", 24).unwrap();
        network.place_device(5, 5, "host", "10.0.0.5", 24).unwrap();
        network.place_device(2, 2, "router", "192.168.1.1", 24).unwrap();
        network.place_device(3, 3, "router", "10.0.0.1", 24).unwrap();

        let report = network.send_packets(Cell::new(0, 0), Cell::new(5, 5), 3).unwrap();
        assert_eq!(report.delivery, Delivery::ViaRouter);
        assert_eq!(report.path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(report.path.last(), Some(&Cell::new(5, 5)));

        let first_router = report.path.iter().position(|c| *c == Cell::new(2, 2)).unwrap();
        let second_router = report.path.iter().position(|c| *c == Cell::new(3, 3)).unwrap();
        assert!(first_router < second_router);
        assert_unit_steps(&report.path);

        assert_eq!(report.packets.len(), 3);
        assert!(report.packets.iter().all(|p| p.path == report.path));
    }

    #[test]
    fn test_cross_subnet_without_router_fails() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);
        network.place_device(0, 0, "host", "192.168.1.10", 24).unwrap();
        network.place_device(5, 5, "host", "10.0.0.5", 24).unwrap();

        let err = network.send_packets(Cell::new(0, 0), Cell::new(5, 5), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRouterAvailable);
    }

    #[test]
    fn test_grid_bounds() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);

        let err = network.place_device(10, 0, "host", "10.0.0.1", 24).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        network.place_device(9, 9, "host", "10.0.0.1", 24).unwrap();
    }

    /// State written by one service instance is visible to the next
    #[test]
    fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut network = open(&dir);
            network.place_device(4, 7, "router", "172.16.0.1", 12).unwrap();
            network.save_topology("campus").unwrap();
        }

        assert!(dir.path().join(NETWORK_FILE).exists());
        assert!(dir.path().join(SAVED_NETWORKS_FILE).exists());

        let network = open(&dir);
        let router = network.topology().device_at(4, 7).unwrap();
        assert_eq!(router.prefix_len(), 12);
        assert_eq!(router.network_prefix().to_string(), "172.16.0.0");
        assert_eq!(network.list_topologies(), vec!["campus"]);
    }

    #[test]
    fn test_saved_topology_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);
        network.place_device(1, 1, "host", "10.0.0.1", 24).unwrap();
        network.save_topology("first").unwrap();

        let err = network.save_topology("first").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);

        network.delete_topology("first").unwrap();
        network.save_topology("first").unwrap();

        network.clear().unwrap();
        let grid = network.load_topology("first").unwrap();
        assert!(grid.device_at(1, 1).is_some());

        let err = network.load_topology("second").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_clear_persists_empty_ten_by_ten_grid() {
        let dir = TempDir::new().unwrap();
        let mut network = open(&dir);
        network.place_device(3, 3, "host", "10.0.0.1", 24).unwrap();
        network.clear().unwrap();

        assert!(network.topology().is_empty());
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                assert!(network.topology().device_at(x, y).is_none());
            }
        }

        let content = fs::read_to_string(dir.path().join(NETWORK_FILE)).unwrap();
        let rows: Vec<Vec<serde_json::Value>> = serde_json::from_str(&content).unwrap();
        assert_eq!(rows.len(), GRID_SIZE);
        assert!(rows.iter().all(|row| row.len() == GRID_SIZE && row.iter().all(|v| v.is_null())));
    }

    /// Files written before prefix lengths existed still load and route
    #[test]
    fn test_legacy_state_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(NETWORK_FILE),
            r#"[[{"tipo": "host", "ip": "192.168.0.10"}, {"tipo": "host", "ip": "192.168.0.11"}]]"#,
        )
        .unwrap();

        let network = open(&dir);
        let report = network.send_packets(Cell::new(0, 0), Cell::new(0, 1), 1).unwrap();
        assert_eq!(report.delivery, Delivery::Direct);
    }

    #[test]
    fn test_config_drives_packet_limit() {
        let dir = TempDir::new().unwrap();
        let mut config_file = NamedTempFile::new().unwrap();
        write!(config_file, "state_dir: {:?}\nmax_packets: 2\n", dir.path()).unwrap();

        let config = load_config(config_file.path()).unwrap();
        let mut network =
            NetworkService::open(JsonFileStore::new(&config.state_dir), config.max_packets).unwrap();
        network.place_device(0, 0, "host", "10.0.0.1", 24).unwrap();
        network.place_device(0, 2, "host", "10.0.0.2", 24).unwrap();

        assert!(network.send_packets(Cell::new(0, 0), Cell::new(0, 2), 2).is_ok());
        let err = network.send_packets(Cell::new(0, 0), Cell::new(0, 2), 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    /// Normalizing old records is logged; current records load silently
    #[test]
    fn test_legacy_records_logged_when_normalized() {
        capture_warnings();

        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(NETWORK_FILE),
            r#"[[{"tipo": "host", "ip": "192.168.77.10"}]]"#,
        )
        .unwrap();

        let network = open(&dir);
        assert_eq!(network.topology().device_count(), 1);
        assert_eq!(warnings_mentioning("192.168.77.10"), 1);
        assert!(warnings_mentioning("Padding jagged grid") >= 1);

        let current = TempDir::new().unwrap();
        {
            let mut network = open(&current);
            network.place_device(2, 2, "host", "10.77.0.9", 24).unwrap();
        }
        let reopened = open(&current);
        assert_eq!(reopened.topology().device_count(), 1);
        assert_eq!(warnings_mentioning("10.77.0.9"), 0);
    }
}
