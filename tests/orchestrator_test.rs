//! 两阶段编排：断点续跑、失败隔离、前置校验

mod common;

use std::fs;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{test_config, vid, write_cookie_file, FakeDriver, FakePlan};
use video_privater::workflow::selectors;
use video_privater::{App, ProgressStore};

#[tokio::test]
async fn test_resume_is_idempotent() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let config = test_config(dir.path());
    write_cookie_file(&config);

    // 账本里已经有全部三条
    let mut seed = ProgressStore::load(&config.progress_file).expect("加载账本失败");
    for url in [vid(3), vid(2), vid(1)] {
        seed.mark_done(&url).expect("预置账本失败");
    }
    let before = fs::read(&config.progress_file).expect("读取账本失败");

    let plan = Arc::new(FakePlan::new(vec![vec![vid(1), vid(2), vid(3)]]));
    let driver = Box::new(FakeDriver::new(plan.clone()));
    let mut app = App::initialize(config.clone(), driver)
        .await
        .expect("初始化失败");

    let tally = app.run("tester", 50).await.expect("运行失败");

    assert_eq!(tally.success, 0);
    assert_eq!(tally.skipped, 3);
    assert_eq!(tally.failed, 0);
    assert_eq!(tally.total, 3);

    let after = fs::read(&config.progress_file).expect("读取账本失败");
    assert_eq!(before, after, "账本文件应该逐字节不变");
}

#[tokio::test]
async fn test_failed_item_is_isolated() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let config = test_config(dir.path());
    write_cookie_file(&config);

    // 第二条视频的下拉框永远等不到
    let plan = Arc::new(
        FakePlan::new(vec![vec![vid(1), vid(2), vid(3)]])
            .missing_selector(&vid(2), selectors::DROPDOWN_TRIGGER),
    );
    let driver = Box::new(FakeDriver::new(plan.clone()));
    let mut app = App::initialize(config.clone(), driver)
        .await
        .expect("初始化失败");

    let tally = app.run("tester", 50).await.expect("运行失败");

    // 处理顺序是 [3, 2, 1]：失败夹在两次成功中间
    assert_eq!(tally.success, 2);
    assert_eq!(tally.failed, 1);
    assert_eq!(tally.skipped, 0);

    let store = ProgressStore::load(&config.progress_file).expect("加载账本失败");
    assert!(store.contains(&vid(3)));
    assert!(store.contains(&vid(1)), "失败之后的视频应该继续被处理");
    assert!(!store.contains(&vid(2)), "失败的视频绝不能进账本");

    // 两个阶段的会话都被释放，登录态只注入过一次
    assert_eq!(plan.launches.load(Ordering::SeqCst), 2);
    assert_eq!(plan.closes.load(Ordering::SeqCst), 2);
    assert_eq!(plan.injected_scripts.load(Ordering::SeqCst), 1);
    assert_eq!(plan.cookie_sets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_auth_file_aborts_before_launch() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let config = test_config(dir.path());
    // 故意不写 cookies.json

    let plan = Arc::new(FakePlan::new(vec![vec![vid(1)]]));
    let result = App::initialize(config, Box::new(FakeDriver::new(plan.clone()))).await;

    assert!(result.is_err(), "凭证缺失应该直接失败");
    assert_eq!(
        plan.launches.load(Ordering::SeqCst),
        0,
        "凭证缺失时不应该启动任何会话"
    );
}

#[tokio::test]
async fn test_collected_file_respects_limit() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let config = test_config(dir.path());
    write_cookie_file(&config);

    let plan = Arc::new(FakePlan::new(vec![vec![vid(1), vid(2), vid(3)]]));
    let driver = Box::new(FakeDriver::new(plan.clone()));
    let mut app = App::initialize(config.clone(), driver)
        .await
        .expect("初始化失败");

    let tally = app.run("tester", 2).await.expect("运行失败");

    let content = fs::read_to_string(&config.collected_file).expect("读取收集结果失败");
    let collected: Vec<String> = serde_json::from_str(&content).expect("收集结果应该是 JSON 数组");
    assert_eq!(collected, vec![vid(3), vid(2)]);

    assert_eq!(tally.total, 2);
    assert_eq!(tally.success, 2);

    let store = ProgressStore::load(&config.progress_file).expect("加载账本失败");
    assert_eq!(store.len(), 2);
}
