/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : SparseAdam 优化器测试
 */

use approx::assert_abs_diff_eq;

use crate::nn::{
    Grad, InputArchive, NnError, Optimizer, OutputArchive, Parameter, SparseAdam,
    SparseAdamOptions, is_grad_enabled,
};
use crate::tensor::{SparseTensor, Tensor};

fn sparse_grad(indices: &[usize], values: &[f32], shape: &[usize]) -> Grad {
    let mut values_shape = vec![indices.len()];
    values_shape.extend_from_slice(&shape[1..]);
    Grad::Sparse(
        SparseTensor::new(
            indices.to_vec(),
            Tensor::new(values, &values_shape),
            shape.to_vec(),
        )
        .unwrap(),
    )
}

#[test]
fn test_options_defaults() {
    let options = SparseAdamOptions::new(0.001);
    assert_eq!(options.learning_rate, 0.001);
    assert_eq!(options.beta1, 0.9);
    assert_eq!(options.beta2, 0.999);
    assert_eq!(options.weight_decay, 0.);
    assert_eq!(options.eps, 1e-8);
    assert!(!options.amsgrad);
}

#[test]
fn test_learning_rate_modification() {
    let param = Parameter::new(Tensor::zeros(&[2]));
    let mut optimizer = SparseAdam::new(&[param], SparseAdamOptions::new(0.001));
    assert_eq!(optimizer.learning_rate(), 0.001);

    optimizer.set_learning_rate(0.0001);
    assert_eq!(optimizer.learning_rate(), 0.0001);
}

#[test]
fn test_step_without_grad_changes_nothing() {
    let param = Parameter::new(Tensor::new(&[1., 2.], &[2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));

    optimizer.step().unwrap();

    assert_eq!(param.value(), Tensor::new(&[1., 2.], &[2]));
    assert_eq!(optimizer.step_count(0), 0);
    assert!(optimizer.exp_average(0).is_none());
}

#[test]
fn test_dense_grad_is_rejected_and_later_params_untouched() {
    let p0 = Parameter::new(Tensor::new(&[1., 1.], &[2]));
    let p1 = Parameter::new(Tensor::new(&[2., 2.], &[2]));
    let p2 = Parameter::new(Tensor::new(&[3., 3.], &[2]));
    let mut optimizer = SparseAdam::new(
        &[p0.clone(), p1.clone(), p2.clone()],
        SparseAdamOptions::new(0.1),
    );

    p0.set_grad(sparse_grad(&[0], &[1.], &[2])).unwrap();
    p1.set_grad(Grad::Dense(Tensor::new(&[1., 1.], &[2]))).unwrap();
    p2.set_grad(sparse_grad(&[1], &[1.], &[2])).unwrap();

    let result = optimizer.step();
    assert!(matches!(result, Err(NnError::UnsupportedOperation(_))));

    // 按注册顺序处理：p1处失败即中止，p2未被访问、未被更新
    assert_eq!(p1.value(), Tensor::new(&[2., 2.], &[2]));
    assert_eq!(p2.value(), Tensor::new(&[3., 3.], &[2]));
    assert_eq!(optimizer.step_count(2), 0);
}

#[test]
fn test_single_step_matches_closed_form() {
    // beta1=0.9, beta2=0.999, eps=1e-8, lr=0.1，单个梯度值g=1.0、矩从0起步
    let param = Parameter::new(Tensor::new(&[1., 1., 1.], &[3]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));

    param.set_grad(sparse_grad(&[1], &[1.], &[3])).unwrap();
    optimizer.step().unwrap();

    let (beta1, beta2, eps, lr, g) = (0.9f32, 0.999f32, 1e-8f32, 0.1f32, 1.0f32);
    let m = (1. - beta1) * g; // 0.1
    let v = (1. - beta2) * g * g; // 0.001
    assert_abs_diff_eq!(
        optimizer.exp_average(0).unwrap().get(&[1]),
        m,
        epsilon = 1e-7
    );
    assert_abs_diff_eq!(
        optimizer.exp_average_sq(0).unwrap().get(&[1]),
        v,
        epsilon = 1e-7
    );

    let bias_correction1 = 1. - beta1; // 0.1
    let bias_correction2 = 1. - beta2; // 0.001
    let expected_delta = lr * bias_correction2.sqrt() / bias_correction1 * (m / (v.sqrt() + eps));
    assert_abs_diff_eq!(param.value().get(&[1]), 1. - expected_delta, epsilon = 1e-6);

    // 坐标集之外的条目逐位不变
    assert_eq!(param.value().get(&[0]), 1.);
    assert_eq!(param.value().get(&[2]), 1.);
}

#[test]
fn test_multi_step_matches_scalar_reference() {
    // 以标量递推为参照，连续10步喂同一稀疏梯度
    let (beta1, beta2, eps, lr, g) = (0.9f32, 0.999f32, 1e-8f32, 0.05f32, 0.5f32);
    let param = Parameter::new(Tensor::new(&[1., 1.], &[2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(lr));

    let mut theta = 1.0f32;
    let mut m = 0.0f32;
    let mut v = 0.0f32;
    for t in 1..=10u32 {
        param.set_grad(sparse_grad(&[0], &[g], &[2])).unwrap();
        optimizer.step().unwrap();
        optimizer.zero_grad();

        m += (g - m) * (1. - beta1);
        v += (g * g - v) * (1. - beta2);
        let bias_correction1 = 1. - beta1.powi(t as i32);
        let bias_correction2 = 1. - beta2.powi(t as i32);
        theta -= lr * bias_correction2.sqrt() / bias_correction1 * (m / (v.sqrt() + eps));
    }

    assert_eq!(optimizer.step_count(0), 10);
    assert_abs_diff_eq!(param.value().get(&[0]), theta, epsilon = 1e-5);
    // 未被梯度触及的坐标1纹丝不动
    assert_eq!(param.value().get(&[1]), 1.);
}

#[test]
fn test_constant_gradient_update_approaches_learning_rate() {
    // 矩从0起步且梯度恒定时，偏差修正与矩估计恰好相消，
    // 每步的参数变化量都约等于lr（这正是偏差修正随β1^t、β2^t几何衰减趋于1的效果）
    let lr = 0.01f32;
    let param = Parameter::new(Tensor::new(&[0.], &[1]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(lr));

    let steps = 200;
    for _ in 0..steps {
        param.set_grad(sparse_grad(&[0], &[1.], &[1])).unwrap();
        optimizer.step().unwrap();
        optimizer.zero_grad();
    }

    assert_abs_diff_eq!(
        param.value().get(&[0]),
        -(steps as f32) * lr,
        epsilon = 1e-2
    );
}

#[test]
fn test_step_count_increments_only_when_grad_present() {
    let param = Parameter::new(Tensor::new(&[1., 1.], &[2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));

    param.set_grad(sparse_grad(&[0], &[1.], &[2])).unwrap();
    optimizer.step().unwrap();
    optimizer.zero_grad();
    assert_eq!(optimizer.step_count(0), 1);

    // 没有梯度的一轮：不计步数、值不变
    let snapshot = param.value();
    optimizer.step().unwrap();
    assert_eq!(optimizer.step_count(0), 1);
    assert_eq!(param.value(), snapshot);

    param.set_grad(sparse_grad(&[1], &[1.], &[2])).unwrap();
    optimizer.step().unwrap();
    assert_eq!(optimizer.step_count(0), 2);
}

#[test]
fn test_sparsity_locality() {
    let param = Parameter::new(Tensor::new_random(-1., 1., &[4, 2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));

    // 先走一步触及行1和行3，让矩缓冲带上非零值
    param
        .set_grad(sparse_grad(&[1, 3], &[0.5, 0.5, -0.5, -0.5], &[4, 2]))
        .unwrap();
    optimizer.step().unwrap();
    optimizer.zero_grad();

    let value_before = param.value();
    let exp_average_before = optimizer.exp_average(0).unwrap().clone();
    let exp_average_sq_before = optimizer.exp_average_sq(0).unwrap().clone();

    // 再走一步只触及行1
    param
        .set_grad(sparse_grad(&[1], &[0.25, 0.25], &[4, 2]))
        .unwrap();
    optimizer.step().unwrap();

    // 行0、2、3（坐标集之外）在参数与两个矩缓冲中均逐位不变
    let value_after = param.value();
    let exp_average_after = optimizer.exp_average(0).unwrap();
    let exp_average_sq_after = optimizer.exp_average_sq(0).unwrap();
    for row in [0usize, 2, 3] {
        assert_eq!(value_after.row(row), value_before.row(row));
        assert_eq!(exp_average_after.row(row), exp_average_before.row(row));
        assert_eq!(exp_average_sq_after.row(row), exp_average_sq_before.row(row));
    }
    // 行1确实被更新了
    assert_ne!(value_after.row(1), value_before.row(1));
}

#[test]
fn test_duplicate_coordinates_behave_as_their_sum() {
    let p_dup = Parameter::new(Tensor::new(&[1., 1., 1.], &[3]));
    let p_sum = Parameter::new(Tensor::new(&[1., 1., 1.], &[3]));
    let mut opt_dup = SparseAdam::new(&[p_dup.clone()], SparseAdamOptions::new(0.1));
    let mut opt_sum = SparseAdam::new(&[p_sum.clone()], SparseAdamOptions::new(0.1));

    // 同一坐标出现两次（0.5与0.25）等价于一次0.75
    p_dup
        .set_grad(sparse_grad(&[2, 2], &[0.5, 0.25], &[3]))
        .unwrap();
    p_sum.set_grad(sparse_grad(&[2], &[0.75], &[3])).unwrap();
    opt_dup.step().unwrap();
    opt_sum.step().unwrap();

    assert_eq!(p_dup.value(), p_sum.value());
    assert_eq!(opt_dup.exp_average(0), opt_sum.exp_average(0));
    assert_eq!(opt_dup.exp_average_sq(0), opt_sum.exp_average_sq(0));
}

#[test]
fn test_lazy_state_pads_earlier_untouched_params() {
    let p0 = Parameter::new(Tensor::zeros(&[2]));
    let p1 = Parameter::new(Tensor::new(&[1., 1., 1.], &[3]));
    let mut optimizer = SparseAdam::new(&[p0, p1.clone()], SparseAdamOptions::new(0.1));

    // 只有1号参数带梯度：状态集合被零填充增长到覆盖1号，0号占位但保持零状态
    p1.set_grad(sparse_grad(&[0], &[1.], &[3])).unwrap();
    optimizer.step().unwrap();

    assert_eq!(optimizer.step_count(0), 0);
    assert_eq!(optimizer.exp_average(0), Some(&Tensor::zeros(&[2])));
    assert_eq!(optimizer.step_count(1), 1);
}

#[test]
fn test_grad_recording_restored_after_step() {
    let param = Parameter::new(Tensor::new(&[1.], &[1]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));
    param.set_grad(sparse_grad(&[0], &[1.], &[1])).unwrap();

    assert!(is_grad_enabled());
    optimizer.step().unwrap();
    // step内部的no-grad作用域退出后，梯度记录恢复开启
    assert!(is_grad_enabled());
}

#[test]
fn test_step_does_not_clear_grads() {
    let param = Parameter::new(Tensor::new(&[1., 1.], &[2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));
    param.set_grad(sparse_grad(&[0], &[1.], &[2])).unwrap();

    optimizer.step().unwrap();
    // 梯度清除是调用方（zero_grad）的职责
    assert!(param.grad().is_some());

    optimizer.zero_grad();
    assert!(param.grad().is_none());
}

#[test]
fn test_reset_clears_all_state() {
    let param = Parameter::new(Tensor::new(&[1., 1.], &[2]));
    let mut optimizer = SparseAdam::new(&[param.clone()], SparseAdamOptions::new(0.1));
    param.set_grad(sparse_grad(&[0], &[1.], &[2])).unwrap();
    optimizer.step().unwrap();

    optimizer.reset();
    assert_eq!(optimizer.step_count(0), 0);
    assert!(optimizer.exp_average(0).is_none());
}

#[test]
fn test_save_load_round_trip_reproduces_updates() {
    // 原优化器训练两步
    let p_a = Parameter::new(Tensor::new(&[1., 2., 3., 4.], &[4]));
    let mut opt_a = SparseAdam::new(&[p_a.clone()], SparseAdamOptions::new(0.1));
    for _ in 0..2 {
        p_a.set_grad(sparse_grad(&[1, 3], &[0.5, -0.25], &[4]))
            .unwrap();
        opt_a.step().unwrap();
        opt_a.zero_grad();
    }

    let mut output = OutputArchive::new();
    opt_a.save(&mut output).unwrap();
    let input = InputArchive::from_bytes(&output.to_bytes().unwrap()).unwrap();

    // 新优化器先自行走一步制造“脏”状态，load必须整体替换而非合并
    let p_b = Parameter::new(p_a.value());
    let mut opt_b = SparseAdam::new(&[p_b.clone()], SparseAdamOptions::new(0.1));
    p_b.set_grad(sparse_grad(&[0], &[9.], &[4])).unwrap();
    opt_b.step().unwrap();
    opt_b.zero_grad();
    opt_b.load(&input).unwrap();

    // 加载后状态逐位一致
    assert_eq!(opt_a.step_count(0), opt_b.step_count(0));
    assert_eq!(opt_a.exp_average(0), opt_b.exp_average(0));
    assert_eq!(opt_a.exp_average_sq(0), opt_b.exp_average_sq(0));

    // p_b的值在load前被那“脏”一步改过，拉回到与p_a相同再对比后续更新
    let _guard = crate::nn::NoGradGuard::new();
    p_b.update_value(|value| *value = p_a.value()).unwrap();
    drop(_guard);

    let grad = sparse_grad(&[2, 3], &[1., 0.5], &[4]);
    p_a.set_grad(grad.clone()).unwrap();
    p_b.set_grad(grad).unwrap();
    opt_a.step().unwrap();
    opt_b.step().unwrap();

    assert_eq!(p_a.value(), p_b.value());
    assert_eq!(opt_a.exp_average(0), opt_b.exp_average(0));
    assert_eq!(opt_a.exp_average_sq(0), opt_b.exp_average_sq(0));
}

#[test]
fn test_load_rejects_mismatched_buffer_shape() {
    let param = Parameter::new(Tensor::zeros(&[2]));
    let mut source = SparseAdam::new(
        &[Parameter::new(Tensor::zeros(&[3]))],
        SparseAdamOptions::new(0.1),
    );
    source.params()[0]
        .set_grad(sparse_grad(&[0], &[1.], &[3]))
        .unwrap();
    source.step().unwrap();

    let mut output = OutputArchive::new();
    source.save(&mut output).unwrap();
    let input = InputArchive::from_bytes(&output.to_bytes().unwrap()).unwrap();

    let mut target = SparseAdam::new(&[param], SparseAdamOptions::new(0.1));
    assert!(matches!(
        target.load(&input),
        Err(NnError::ShapeMismatch { .. })
    ));
}
