// ## 🧪 Device decisions, flash bundle hand-off and the full preparation flow

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use scatter_core::config::WorkspaceLayout;
    use scatter_core::constants::props;
    use scatter_core::container::encode_container_random;
    use scatter_core::device::{check_region, detect_platform, normalize_platform, DeviceInfo, RegionCheck};
    use scatter_core::flash::{
        flash_manifest_targets, replace_prc_images, resolve_auth_bundle, resolve_flash_manifest,
        rewrite_history, update_history, FlashBundle, PrcReport,
    };
    use scatter_core::flow::{prepare_flow, FlowOutcome, PlatformSource};
    use scatter_core::pipeline::FlashStrategy;
    use tempfile::{tempdir, TempDir};

    const SCATTER: &str = "<root>
  <partition_index>
    <partition_name>proinfo</partition_name>
    <file_name>NONE</file_name>
  </partition_index>
  <partition_index>
    <partition_name>userdata</partition_name>
    <file_name>userdata.img</file_name>
  </partition_index>
</root>
";

    fn device(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    /// Base directory with the default layout, one container and a flash bundle.
    fn workspace(platform: &str, flash_xml: &str) -> (TempDir, WorkspaceLayout) {
        let base = tempdir().unwrap();
        let layout = WorkspaceLayout::from_base(base.path());
        fs::create_dir_all(&layout.download_agent_dir).unwrap();
        fs::create_dir_all(&layout.readback_dir).unwrap();
        fs::write(
            layout.image_dir.join(format!("{platform}_Android_scatter.x")),
            encode_container_random(SCATTER.as_bytes()).unwrap(),
        )
        .unwrap();
        fs::write(layout.download_agent_dir.join("flash.xml"), flash_xml).unwrap();
        fs::write(layout.download_agent_dir.join("da.auth"), b"\x00auth").unwrap();
        (base, layout)
    }

    // ---- device ----

    #[test]
    fn platform_is_normalized() {
        assert_eq!(normalize_platform(" mt6765\n").as_deref(), Some("MT6765"));
        assert_eq!(normalize_platform("MT6789").as_deref(), Some("MT6789"));
        assert_eq!(normalize_platform("sdm660"), None);
        assert_eq!(normalize_platform(""), None);
    }

    #[test]
    fn platform_detected_from_properties() {
        let source = device(&[(props::PLATFORM, "mt6789")]);
        assert_eq!(detect_platform(&source).as_deref(), Some("MT6789"));

        let closure = |name: &str| {
            if name == props::PLATFORM { "qcom".to_string() } else { String::new() }
        };
        assert_eq!(detect_platform(&closure), None);
    }

    #[test]
    fn region_gate() {
        let check = |v: &str| check_region(&device(&[(props::REGION, v)]));
        assert_eq!(check(""), RegionCheck::Global);
        assert_eq!(check(" row "), RegionCheck::Global);
        assert_eq!(check("PRC"), RegionCheck::ChinaRom);
        assert_eq!(check("eu"), RegionCheck::Unknown { value: "EU".to_string() });
        assert!(check("ROW").allows_data_preserving());
        assert!(!check("prc").allows_data_preserving());
        assert!(!check("EU").allows_data_preserving());
        assert_eq!(check_region(&HashMap::<String, String>::new()), RegionCheck::Global);
    }

    #[test]
    fn device_info_is_trimmed() {
        let source = device(&[(props::HW_VERSION, " REV-B \n"), (props::CPU_INFO, "MT6765V/CB")]);
        let info = DeviceInfo::read(&source);
        assert_eq!(info.hw_version, "REV-B");
        assert_eq!(info.cpu_info, "MT6765V/CB");
        assert_eq!(DeviceInfo::read(&HashMap::<String, String>::new()), DeviceInfo::default());
    }

    // ---- flash bundle ----

    #[test]
    fn bundle_prefers_download_agent_dir() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::write(layout.image_dir.join("flash.xml"), "MT6765").unwrap();
        fs::write(layout.image_dir.join("da.auth"), "x").unwrap();

        assert_eq!(
            resolve_flash_manifest(&layout),
            Some(layout.download_agent_dir.join("flash.xml"))
        );
        assert_eq!(
            resolve_auth_bundle(&layout),
            Some(layout.download_agent_dir.join("da.auth"))
        );
    }

    #[test]
    fn bundle_falls_back_to_image_dir() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::remove_file(layout.download_agent_dir.join("da.auth")).unwrap();
        fs::write(layout.image_dir.join("da.auth"), "x").unwrap();

        assert_eq!(
            resolve_flash_manifest(&layout),
            Some(layout.download_agent_dir.join("flash.xml"))
        );
        assert_eq!(resolve_auth_bundle(&layout), Some(layout.image_dir.join("da.auth")));
    }

    #[test]
    fn bundle_files_resolve_independently() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::remove_file(layout.download_agent_dir.join("flash.xml")).unwrap();
        assert_eq!(resolve_flash_manifest(&layout), None);
        assert!(resolve_auth_bundle(&layout).is_some());
    }

    // ---- PRC images ----

    #[test]
    fn prc_images_overwrite_and_fill_in() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::create_dir_all(&layout.prc_dir).unwrap();
        fs::write(layout.prc_dir.join("lk.img"), "prc-lk").unwrap();
        fs::write(layout.prc_dir.join("dtbo.img"), "prc-dtbo").unwrap();
        // lk.img exists and is overwritten; dtbo.img is missing and gets created.
        fs::write(layout.image_dir.join("lk.img"), "row-lk").unwrap();

        let report = replace_prc_images(&layout);
        assert_eq!(report, PrcReport { copied: 2, skipped: 0, failed: 0 });
        assert_eq!(fs::read_to_string(layout.image_dir.join("lk.img")).unwrap(), "prc-lk");
        assert_eq!(fs::read_to_string(layout.image_dir.join("dtbo.img")).unwrap(), "prc-dtbo");
        assert_eq!(fs::read_to_string(layout.prc_dir.join("lk.img")).unwrap(), "prc-lk");
    }

    #[test]
    fn prc_image_without_source_is_left_alone() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::create_dir_all(&layout.prc_dir).unwrap();
        fs::write(layout.prc_dir.join("lk.img"), "prc-lk").unwrap();
        fs::write(layout.image_dir.join("dtbo.img"), "row-dtbo").unwrap();

        let report = replace_prc_images(&layout);
        assert_eq!(report, PrcReport { copied: 1, skipped: 1, failed: 0 });
        assert_eq!(fs::read_to_string(layout.image_dir.join("dtbo.img")).unwrap(), "row-dtbo");
        assert_eq!(fs::read_to_string(layout.image_dir.join("lk.img")).unwrap(), "prc-lk");
    }

    #[test]
    fn missing_prc_dir_is_a_no_op() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::write(layout.image_dir.join("lk.img"), "row-lk").unwrap();

        assert_eq!(replace_prc_images(&layout), PrcReport::default());
        assert_eq!(fs::read_to_string(layout.image_dir.join("lk.img")).unwrap(), "row-lk");
    }

    #[test]
    fn flash_manifest_platform_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flash.xml");
        fs::write(&path, "<flash><platform>MT6765</platform></flash>").unwrap();
        assert!(flash_manifest_targets(&path, "MT6765").unwrap());
        assert!(!flash_manifest_targets(&path, "MT6789").unwrap());
        assert!(flash_manifest_targets(&dir.path().join("missing.xml"), "MT6765").is_err());
    }

    // ---- tool history ----

    #[test]
    fn history_lines_replaced_in_place() {
        let existing = "[General]\n  flashxmlHistory=C:/old/flash.xml\nlanguage=en\nlastAuthDir=C:/old/da.auth\n";
        let out = rewrite_history(existing, "/fw/flash.xml", "/fw/da.auth");
        assert_eq!(
            out,
            "[General]\nflashxmlHistory=/fw/flash.xml\nlanguage=en\nlastAuthDir=/fw/da.auth\n"
        );
    }

    #[test]
    fn history_missing_keys_appended() {
        let out = rewrite_history("[General]\r\nlanguage=en", "/fw/flash.xml", "/fw/da.auth");
        assert_eq!(
            out,
            "[General]\nlanguage=en\nflashxmlHistory=/fw/flash.xml\nlastAuthDir=/fw/da.auth\n"
        );
        assert_eq!(
            rewrite_history("", "a", "b"),
            "flashxmlHistory=a\nlastAuthDir=b\n"
        );
    }

    #[test]
    fn history_file_written_with_absolute_paths() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        let bundle = FlashBundle {
            flash_manifest: resolve_flash_manifest(&layout).unwrap(),
            auth_bundle: resolve_auth_bundle(&layout).unwrap(),
        };
        let path = update_history(&layout.tools_dir, &bundle).unwrap();

        let text = fs::read_to_string(path).unwrap();
        let flash = fs::canonicalize(&bundle.flash_manifest).unwrap();
        assert!(text.contains(&format!("flashxmlHistory={}", flash.display())));
        assert!(text.ends_with('\n'));
    }

    // ---- flow ----

    #[test]
    fn flow_ready_for_detected_device() {
        let (_base, layout) = workspace("MT6765", "<flash platform=\"MT6765\"/>");
        fs::write(layout.tools_dir.join("history.ini"), "language=en\n").unwrap();
        fs::write(layout.readback_dir.join("proinfo_backup"), "stale").unwrap();
        fs::create_dir_all(&layout.prc_dir).unwrap();
        fs::write(layout.prc_dir.join("lk.img"), "prc-lk").unwrap();

        let source = device(&[
            (props::PLATFORM, "mt6765"),
            (props::REGION, "ROW"),
            (props::HW_VERSION, "REV-A"),
        ]);
        let outcome =
            prepare_flow(&layout, PlatformSource::Device(&source), FlashStrategy::DataPreserving)
                .unwrap();

        let (info, report, bundle, prc) = match outcome {
            FlowOutcome::Ready { device, report, bundle, prc } => (device, report, bundle, prc),
            other => panic!("expected Ready, got {other:?}"),
        };
        assert_eq!(info.hw_version, "REV-A");
        assert_eq!(report.platform, "MT6765");
        assert!(report.data_preserving.is_some());
        assert!(report.final_manifest.exists());
        assert_eq!(bundle.auth_bundle, layout.download_agent_dir.join("da.auth"));
        assert!(!layout.readback_dir.join("proinfo_backup").exists());
        assert_eq!(prc.copied, 1);
        assert_eq!(fs::read(layout.image_dir.join("lk.img")).unwrap(), b"prc-lk");

        // The sweep removed the old history; only our two keys remain.
        let history = fs::read_to_string(layout.tools_dir.join("history.ini")).unwrap();
        assert_eq!(history.lines().count(), 2);
        assert!(history.starts_with("flashxmlHistory="));
    }

    #[test]
    fn flow_with_explicit_platform_skips_region() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("mt6765"), FlashStrategy::DataPreserving)
                .unwrap();
        assert!(outcome.is_ready(), "{outcome:?}");
    }

    #[test]
    fn flow_refuses_china_rom_for_data_preserving() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        let source = device(&[(props::PLATFORM, "MT6765"), (props::REGION, "PRC")]);

        let outcome =
            prepare_flow(&layout, PlatformSource::Device(&source), FlashStrategy::DataPreserving)
                .unwrap();
        assert!(matches!(
            outcome,
            FlowOutcome::RegionRefused { region: RegionCheck::ChinaRom }
        ));
        assert!(!layout.image_dir.join("MT6765_Android_scatter.xml").exists());

        // Full reprovision does not care about the region.
        let outcome =
            prepare_flow(&layout, PlatformSource::Device(&source), FlashStrategy::Full).unwrap();
        assert!(outcome.is_ready(), "{outcome:?}");
    }

    #[test]
    fn flow_unsupported_platform() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        let source = device(&[(props::PLATFORM, "sm8250")]);
        let outcome =
            prepare_flow(&layout, PlatformSource::Device(&source), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::UnsupportedPlatform { ref raw } if raw == "sm8250"));
    }

    #[test]
    fn flow_without_container() {
        let base = tempdir().unwrap();
        let layout = WorkspaceLayout::from_base(base.path());
        fs::create_dir_all(&layout.image_dir).unwrap();

        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::NoContainer { ref platform } if platform == "MT6765"));
    }

    #[test]
    fn flow_without_bundle() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::remove_file(layout.download_agent_dir.join("da.auth")).unwrap();
        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::NoFlashBundle { .. }));
    }

    #[test]
    fn flow_platform_mismatch() {
        let (_base, layout) = workspace("MT6765", "<flash platform=\"MT6789\"/>");
        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::PlatformMismatch { .. }));
        assert!(!layout.tools_dir.join("history.ini").exists());
    }

    #[test]
    fn flow_checks_flash_manifest_before_auth_bundle() {
        let (_base, layout) = workspace("MT6765", "<flash platform=\"MT6789\"/>");
        fs::remove_file(layout.download_agent_dir.join("da.auth")).unwrap();
        fs::create_dir_all(&layout.prc_dir).unwrap();
        fs::write(layout.prc_dir.join("lk.img"), "prc-lk").unwrap();

        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::PlatformMismatch { .. }), "{outcome:?}");
        // Nothing is swapped in for a firmware package built for another SoC.
        assert!(!layout.image_dir.join("lk.img").exists());
    }

    #[test]
    fn flow_without_auth_bundle_after_platform_check() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        fs::remove_file(layout.download_agent_dir.join("da.auth")).unwrap();
        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        assert!(matches!(outcome, FlowOutcome::NoFlashBundle { .. }), "{outcome:?}");
    }

    #[test]
    fn flow_outcome_serializes_with_status_tag() {
        let (_base, layout) = workspace("MT6765", "MT6765");
        let outcome =
            prepare_flow(&layout, PlatformSource::Explicit("MT6765"), FlashStrategy::Full).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["report"]["strategy"], "full");
    }
}
