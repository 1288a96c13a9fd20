use crate::tensor::{NoGradGuard, Tensor, is_grad_enabled, no_grad};

#[test]
fn test_no_grad_closure() {
    assert!(is_grad_enabled());
    let enabled_inside = no_grad(is_grad_enabled);
    assert!(!enabled_inside);
    assert!(is_grad_enabled());

    // 嵌套后恢复为外层状态
    no_grad(|| {
        no_grad(|| assert!(!is_grad_enabled()));
        assert!(!is_grad_enabled());
    });
    assert!(is_grad_enabled());
}

#[test]
fn test_no_grad_guard() {
    {
        let _guard = NoGradGuard::new();
        assert!(!is_grad_enabled());
    }
    assert!(is_grad_enabled());
}

#[test]
fn test_results_are_not_tracked_under_no_grad() {
    let x = Tensor::ones(&[2]).with_requires_grad(true).unwrap();

    let y = &x * 2.;
    assert!(y.requires_grad());
    assert!(!y.is_leaf());

    let y = no_grad(|| &x * 2.);
    assert!(!y.requires_grad());
    assert!(y.is_leaf());
}
