//! Integration tests for the harvester
//!
//! These tests use wiremock to serve listing pages and document files and
//! drive the walker, the download coordinator and a full run end-to-end.

use netco_harvest::catalog::{Category, CategoryResultSet, DocumentRecord};
use netco_harvest::config::Config;
use netco_harvest::crawler::{CategoryWalker, Coordinator};
use netco_harvest::download::DownloadCoordinator;
use netco_harvest::output::{load_snapshot, save_snapshot};
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing page with the given table rows and optional last page
fn listing_page(rows: &[(&str, &str, &str, &str, &str, &str)], last_page: Option<u32>) -> String {
    let body: String = rows
        .iter()
        .map(|(name, href, size, downloads, modified, uploader)| {
            format!(
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                href, name, size, downloads, modified, uploader
            )
        })
        .collect();

    let pager = last_page
        .map(|page| {
            format!(
                r#"<div class="pager"><a class="ModulePager LastPage" href="/listing?pagenumber={}">»</a></div>"#,
                page
            )
        })
        .unwrap_or_default();

    format!(
        "<html><body><table><thead><tr><th>Tên</th></tr></thead><tbody>{}</tbody></table>{}</body></html>",
        body, pager
    )
}

fn write_bootstrap(html_dir: &Path, category: Category, last_page: Option<u32>) {
    std::fs::create_dir_all(html_dir).unwrap();
    std::fs::write(
        html_dir.join(format!("{}.html", category.key())),
        listing_page(&[], last_page),
    )
    .unwrap();
}

async fn mount_page(server: &MockServer, category: Category, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", category.key())))
        .and(query_param("pagenumber", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, file_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Counts the requests the server received for document files
async fn file_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().starts_with("/files/"))
        .count()
}

fn record(category: Category, name: &str, href: &str, size: &str, downloads: &str) -> DocumentRecord {
    let mut record = DocumentRecord::new(category, name, href);
    record.size = size.to_string();
    record.downloads = downloads.to_string();
    record.modified = "01/02/2024".to_string();
    record.uploaded_by = "admin".to_string();
    record
}

fn downloader(server: &MockServer, root: &Path, max_concurrent: usize) -> DownloadCoordinator {
    DownloadCoordinator::new(
        reqwest::Client::new(),
        root,
        Url::parse(&server.uri()).expect("Failed to parse mock server URI"),
        max_concurrent,
    )
}

#[tokio::test]
async fn test_walker_stops_at_first_empty_page() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let html_dir = dir.path().join("html");
    let category = Category::FinancialStatement;

    write_bootstrap(&html_dir, category, Some(3));

    Mock::given(method("GET"))
        .and(path("/bao-cao-tai-chinh"))
        .and(query_param("pagenumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[
                ("BCTC Q1 2024", "/files/q1.pdf", "1 MB", "12", "01/04/2024", "admin"),
                ("BCTC Q2 2024", "/files/q2.pdf", "1 MB", "8", "01/07/2024", "admin"),
            ],
            Some(3),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bao-cao-tai-chinh"))
        .and(query_param("pagenumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], Some(3))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bao-cao-tai-chinh"))
        .and(query_param("pagenumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[("Never fetched", "/files/never.pdf", "", "", "", "")],
            Some(3),
        )))
        .expect(0)
        .mount(&server)
        .await;

    let walker = CategoryWalker::new(
        reqwest::Client::new(),
        server.uri(),
        &html_dir,
        dir.path().join("documents"),
    );
    let documents = walker.walk_category(category).await.expect("Walk failed");

    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["BCTC Q1 2024", "BCTC Q2 2024"]);
    assert!(dir.path().join("documents").join("Báo cáo tài chính").is_dir());

    server.verify().await;
}

#[tokio::test]
async fn test_walker_skips_failed_pages() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let html_dir = dir.path().join("html");
    let category = Category::InformationDisclosure;

    write_bootstrap(&html_dir, category, Some(3));

    mount_page(
        &server,
        category,
        1,
        listing_page(&[("CBTT 01", "/files/cbtt-01.pdf", "", "", "", "")], Some(3)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cong-bao-thong-tin"))
        .and(query_param("pagenumber", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(
        &server,
        category,
        3,
        listing_page(&[("CBTT 03", "/files/cbtt-03.pdf", "", "", "", "")], Some(3)),
    )
    .await;

    let walker = CategoryWalker::new(
        reqwest::Client::new(),
        server.uri(),
        &html_dir,
        dir.path().join("documents"),
    );
    let documents = walker.walk_category(category).await.expect("Walk failed");

    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["CBTT 01", "CBTT 03"]);
}

#[tokio::test]
async fn test_tie_keeps_first_seen_and_fetches_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/baocao-2023.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"report".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let a = record(Category::CompanyCharter, "BaoCao2023.pdf", "/files/baocao-2023.pdf", "", "10");
    let b = record(Category::CompanyCharter, "BaoCao2023.pdf", "/files/baocao-2023.pdf", "2MB", "");
    let collected: CategoryResultSet = vec![a.clone(), b].into_iter().collect();

    let pass = downloader(&server, dir.path(), 10)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.survivors.all_documents(), vec![a.clone()]);
    assert_eq!(pass.report.total, 2);
    assert_eq!(pass.report.duplicates, 1);
    assert_eq!(pass.report.downloaded, 1);
    assert_eq!(pass.report.completed(), 2);
    assert_eq!(
        std::fs::read(dir.path().join(&a.local_path)).unwrap(),
        b"report"
    );

    server.verify().await;
}

#[tokio::test]
async fn test_more_complete_duplicate_wins() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_file(&server, "/files/bctn.pdf", b"annual").await;

    let sparse = record(Category::AnnualReport, "BCTN 2023", "/files/bctn.pdf", "", "");
    let full = record(Category::AnnualReport, "BCTN 2023", "/files/bctn.pdf", "4 MB", "31");
    let collected: CategoryResultSet = vec![sparse, full.clone()].into_iter().collect();

    let pass = downloader(&server, dir.path(), 10)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.survivors.all_documents(), vec![full]);
    assert_eq!(pass.report.duplicates, 1);
    assert_eq!(file_requests(&server).await, 1);
}

#[tokio::test]
async fn test_existing_destination_is_not_fetched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let existing = record(Category::Prospectus, "BCB 2020", "/files/bcb-2020.pdf", "1MB", "3");
    let dest = dir.path().join(&existing.local_path);
    std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
    std::fs::write(&dest, b"old").unwrap();

    let collected: CategoryResultSet = vec![existing].into_iter().collect();
    let pass = downloader(&server, dir.path(), 10)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.report.exists_skipped, 1);
    assert_eq!(pass.report.completed(), 1);
    assert_eq!(std::fs::read(&dest).unwrap(), b"old");

    server.verify().await;
}

#[tokio::test]
async fn test_rerun_with_existing_files_is_idempotent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_file(&server, "/files/a.pdf", b"a").await;
    mount_file(&server, "/files/b.pdf", b"b").await;
    mount_file(&server, "/files/c.pdf", b"c").await;

    let collected: CategoryResultSet = vec![
        record(Category::AnnualReport, "A", "/files/a.pdf", "1MB", "1"),
        record(Category::AnnualReport, "A", "/files/a.pdf", "", ""),
        record(Category::FinancialStatement, "B", "/files/b.pdf", "1MB", "1"),
        record(Category::GovernanceRegulation, "C", "/files/c.pdf", "1MB", "1"),
    ]
    .into_iter()
    .collect();

    let coordinator = downloader(&server, dir.path(), 10);

    let first = coordinator.run(&collected).await.expect("First pass failed");
    assert_eq!(first.report.downloaded, 3);
    assert_eq!(file_requests(&server).await, 3);

    let second = coordinator.run(&collected).await.expect("Second pass failed");
    assert_eq!(second.report.downloaded, 0);
    assert_eq!(second.report.exists_skipped, 3);
    assert_eq!(second.report.completed(), first.report.completed());
    assert_eq!(second.survivors, first.survivors);

    // No additional physical fetches on the second pass
    assert_eq!(file_requests(&server).await, 3);
}

#[tokio::test]
async fn test_failed_download_is_counted_and_cleaned_up() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gone = record(Category::CompanyCharter, "Gone", "/files/gone.pdf", "1MB", "1");
    let collected: CategoryResultSet = vec![gone.clone()].into_iter().collect();

    let pass = downloader(&server, dir.path(), 10)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.report.failed, 1);
    assert_eq!(pass.report.completed(), 0);
    // Failed records stay in the survivor set
    assert_eq!(pass.survivors.total_documents(), 1);

    let coordinator = downloader(&server, dir.path(), 10);
    assert!(!coordinator.destination(&gone).exists());
    assert!(!coordinator.staging_path(&gone).exists());
}

#[tokio::test]
async fn test_names_differing_by_temp_suffix_do_not_clobber() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/x.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"plain".to_vec())
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/x-tmp.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"suffixed".to_vec())
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let plain = record(Category::AnnualReport, "X", "/files/x.pdf", "1MB", "1");
    let suffixed = record(Category::AnnualReport, "X.tmp", "/files/x-tmp.pdf", "1MB", "1");
    let collected: CategoryResultSet = vec![plain.clone(), suffixed.clone()].into_iter().collect();

    let coordinator = downloader(&server, dir.path(), 10);
    let pass = coordinator.run(&collected).await.expect("Download pass failed");

    assert_eq!(pass.report.downloaded, 2);
    assert_eq!(std::fs::read(coordinator.destination(&plain)).unwrap(), b"plain");
    assert_eq!(std::fs::read(coordinator.destination(&suffixed)).unwrap(), b"suffixed");
}

#[tokio::test]
async fn test_existing_document_named_like_temp_file_survives() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_file(&server, "/files/x.pdf", b"plain").await;

    let earlier = record(Category::AnnualReport, "X.tmp", "/files/x-tmp.pdf", "1MB", "1");
    let coordinator = downloader(&server, dir.path(), 10);
    let earlier_dest = coordinator.destination(&earlier);
    std::fs::create_dir_all(earlier_dest.parent().unwrap()).unwrap();
    std::fs::write(&earlier_dest, b"kept from an earlier run").unwrap();

    let plain = record(Category::AnnualReport, "X", "/files/x.pdf", "1MB", "1");
    let collected: CategoryResultSet = vec![plain.clone()].into_iter().collect();
    let pass = coordinator.run(&collected).await.expect("Download pass failed");

    assert_eq!(pass.report.downloaded, 1);
    assert_eq!(std::fs::read(coordinator.destination(&plain)).unwrap(), b"plain");
    assert_eq!(std::fs::read(&earlier_dest).unwrap(), b"kept from an earlier run");
}

#[tokio::test]
async fn test_shared_destination_is_fetched_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_file(&server, "/files/v1.pdf", b"v1").await;
    mount_file(&server, "/files/v2.pdf", b"v2").await;

    // Same name and category, different URLs: distinct identities, one path
    let v1 = record(Category::CompanyCharter, "Dieu le", "/files/v1.pdf", "1MB", "1");
    let v2 = record(Category::CompanyCharter, "Dieu le", "/files/v2.pdf", "1MB", "1");
    let collected: CategoryResultSet = vec![v1.clone(), v2].into_iter().collect();

    let pass = downloader(&server, dir.path(), 10)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.survivors.total_documents(), 2);
    assert_eq!(pass.report.downloaded, 1);
    assert_eq!(pass.report.exists_skipped, 1);
    assert_eq!(file_requests(&server).await, 1);
    assert_eq!(std::fs::read(dir.path().join(&v1.local_path)).unwrap(), b"v1");
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"slow".to_vec())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let collected: CategoryResultSet = (1..=4)
        .map(|i| {
            record(
                Category::InformationDisclosure,
                &format!("CBTT {}", i),
                &format!("/files/cbtt-{}.pdf", i),
                "1MB",
                "1",
            )
        })
        .collect();

    let started = Instant::now();
    let pass = downloader(&server, dir.path(), 2)
        .run(&collected)
        .await
        .expect("Download pass failed");

    assert_eq!(pass.report.downloaded, 4);
    // Four 200ms responses through two slots need at least two rounds
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_full_harvest_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let html_dir = dir.path().join("html");
    let documents_dir = dir.path().join("documents");

    for category in Category::ALL {
        write_bootstrap(&html_dir, category, None);
    }

    for category in Category::ALL {
        let rows: Vec<(&str, &str, &str, &str, &str, &str)> = match category {
            Category::FinancialStatement => vec![
                ("BCTC 2023", "/files/bctc-2023.pdf", "2 MB", "40", "01/03/2024", "admin"),
                ("BCTC 2023", "/files/bctc-2023.pdf", "", "40", "", "admin"),
                ("BCTC 2022", "/files/bctc-2022.pdf", "2 MB", "75", "01/03/2023", "admin"),
            ],
            Category::CompanyCharter => vec![(
                "Điều lệ: sửa đổi",
                "/files/dieu-le.pdf",
                "300 KB",
                "12",
                "05/05/2023",
                "admin",
            )],
            Category::Prospectus => vec![("BCB cũ", "/files/missing.pdf", "1 MB", "1", "", "")],
            _ => vec![],
        };
        mount_page(&server, category, 1, listing_page(&rows, None)).await;
    }

    mount_file(&server, "/files/bctc-2023.pdf", b"bctc 2023").await;
    mount_file(&server, "/files/bctc-2022.pdf", b"bctc 2022").await;
    mount_file(&server, "/files/dieu-le.pdf", b"dieu le").await;

    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.site.html_dir = html_dir.display().to_string();
    config.download.documents_dir = documents_dir.display().to_string();
    config.output.snapshot_path = dir.path().join("static").join("data.json").display().to_string();

    let mut coordinator = Coordinator::new(config.clone()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Harvest failed");

    assert_eq!(stats.total_documents, 4);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.downloaded, 3);
    assert_eq!(stats.failed_downloads, 1);
    assert_eq!(stats.per_category.get(&Category::FinancialStatement), Some(&2));
    assert_eq!(stats.per_category.get(&Category::AnnualReport), None);

    // Every category folder exists, downloaded files are in place
    for category in Category::ALL {
        assert!(documents_dir.join(category.display_folder()).is_dir());
    }
    assert_eq!(
        std::fs::read(documents_dir.join("Báo cáo tài chính").join("BCTC 2023")).unwrap(),
        b"bctc 2023"
    );
    assert_eq!(
        std::fs::read(documents_dir.join("Điều lệ công ty").join("Điều lệ_ sửa đổi")).unwrap(),
        b"dieu le"
    );

    // The surviving BCTC 2023 entry is the complete one
    let financial = coordinator
        .documents()
        .get(Category::FinancialStatement)
        .expect("Missing financial statements");
    assert_eq!(financial[0].name, "BCTC 2023");
    assert_eq!(financial[0].size, "2 MB");
    assert_eq!(financial[0].modified, "01/03/2024");

    // Snapshot round-trip of the final mapping
    let snapshot_path = Path::new(&config.output.snapshot_path);
    save_snapshot(coordinator.documents(), snapshot_path).expect("Failed to save snapshot");
    let loaded = load_snapshot(snapshot_path).expect("Failed to load snapshot");
    assert_eq!(&loaded, coordinator.documents());
    assert_eq!(loaded.all_documents(), coordinator.all_documents());
}
